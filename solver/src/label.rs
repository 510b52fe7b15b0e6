use fixedbitset::FixedBitSet;
use model::base_types::{ArcIdx, Cost, PortType, Quantity};
use model::network::nodes::Node;

use crate::network_view::NetworkView;

/// Labels whose reduced costs differ by at most this are considered equally
/// expensive.
pub const LABEL_COST_TOLERANCE: f64 = 1e-3;

/// State of a partial path in the label-setting search.
///
/// The residual delivery capacity never exceeds the residual pickup capacity:
/// cargo to be delivered is on board from the start, so every pickup also
/// shrinks the room left for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    residual_pickup: Quantity,
    residual_delivery: Quantity,
    reduced_cost: Cost,
    visitable: Option<FixedBitSet>, // elementary labels only
}

/// bit of the (port, role) of a port call in the visitable set.
pub fn visit_bit(node: &Node) -> usize {
    let role = match node.port_type() {
        PortType::Pickup => 0,
        _ => 1,
    };
    node.port().idx() * 2 + role
}

// static functions
impl Label {
    pub fn new(residual_pickup: Quantity, residual_delivery: Quantity, reduced_cost: Cost) -> Label {
        Label {
            residual_pickup,
            residual_delivery,
            reduced_cost,
            visitable: None,
        }
    }

    /// the label at the source: an empty vessel.
    pub fn initial(capacity: Quantity) -> Label {
        Label::new(capacity, capacity, 0.0)
    }

    /// the label at the source of the elementary search; every port-role can
    /// still be visited.
    pub fn initial_elementary(capacity: Quantity, num_ports: usize) -> Label {
        let mut visitable = FixedBitSet::with_capacity(num_ports * 2);
        visitable.insert_range(..);
        Label {
            visitable: Some(visitable),
            ..Label::initial(capacity)
        }
    }
}

// methods
impl Label {
    pub fn residual_pickup(&self) -> Quantity {
        self.residual_pickup
    }

    pub fn residual_delivery(&self) -> Quantity {
        self.residual_delivery
    }

    pub fn reduced_cost(&self) -> Cost {
        self.reduced_cost
    }

    pub fn visitable(&self) -> Option<&FixedBitSet> {
        self.visitable.as_ref()
    }

    pub fn is_elementary(&self) -> bool {
        self.visitable.is_some()
    }

    /// The label after traversing `arc`, or None if the arc is erased, the
    /// demand of its target does not fit or (elementary labels) the target's
    /// port-role was visited already.
    pub fn extend(&self, view: &NetworkView, arc: ArcIdx) -> Option<Label> {
        if view.is_erased(arc) {
            return None;
        }
        let graph = view.graph();
        let target = graph.arc_target(arc);
        let pickup = graph.pickup_demand(target);
        let delivery = graph.delivery_demand(target);
        if self.residual_pickup < pickup || self.residual_delivery < delivery {
            return None;
        }

        let visitable = match &self.visitable {
            Some(visitable) => {
                let node = graph.node(target);
                if node.is_regular_port() {
                    let bit = visit_bit(node);
                    if !visitable.contains(bit) {
                        return None;
                    }
                    let mut remaining = visitable.clone();
                    remaining.set(bit, false);
                    Some(remaining)
                } else {
                    Some(visitable.clone())
                }
            }
            None => None,
        };

        let residual_pickup = self.residual_pickup - pickup;
        Some(Label {
            residual_pickup,
            residual_delivery: residual_pickup.min(self.residual_delivery - delivery),
            reduced_cost: self.reduced_cost + view.reduced_cost(arc),
            visitable,
        })
    }

    /// Strict Pareto dominance between labels at the same vertex: at most as
    /// expensive (within the tolerance), at least as much room for pickups and
    /// deliveries, at least the same port-roles left, and better in one of them.
    pub fn dominates(&self, other: &Label) -> bool {
        if self.reduced_cost > other.reduced_cost + LABEL_COST_TOLERANCE
            || self.residual_pickup < other.residual_pickup
            || self.residual_delivery < other.residual_delivery
        {
            return false;
        }
        let strict_visitable = match (&self.visitable, &other.visitable) {
            (Some(mine), Some(theirs)) => {
                if !mine.is_superset(theirs) {
                    return false;
                }
                mine != theirs
            }
            _ => false,
        };
        self.reduced_cost < other.reduced_cost - LABEL_COST_TOLERANCE
            || self.residual_pickup > other.residual_pickup
            || self.residual_delivery > other.residual_delivery
            || strict_visitable
    }

    /// neither label dominates the other because they are the same state.
    pub fn is_equivalent(&self, other: &Label) -> bool {
        (self.reduced_cost - other.reduced_cost).abs() <= LABEL_COST_TOLERANCE
            && self.residual_pickup == other.residual_pickup
            && self.residual_delivery == other.residual_delivery
            && self.visitable == other.visitable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use solution::test_utilities::{arc, init_test_data};

    fn label_strategy() -> impl Strategy<Value = Label> {
        // costs on an integer grid, so the tolerance never chains
        (0u32..6, 0u32..6, -5i32..5)
            .prop_map(|(pu, de, cost)| Label::new(pu, de.min(pu), cost as f64))
    }

    proptest! {
        #[test]
        fn dominance_is_irreflexive(a in label_strategy()) {
            prop_assert!(!a.dominates(&a));
        }

        #[test]
        fn dominance_is_asymmetric(a in label_strategy(), b in label_strategy()) {
            prop_assert!(!(a.dominates(&b) && b.dominates(&a)));
        }

        #[test]
        fn dominance_is_transitive(
            a in label_strategy(),
            b in label_strategy(),
            c in label_strategy(),
        ) {
            if a.dominates(&b) && b.dominates(&c) {
                prop_assert!(a.dominates(&c));
            }
        }

        #[test]
        fn extension_respects_capacity(residual in 0u32..12) {
            let d = init_test_data();
            let graph = d.network.graph(d.small);
            let view = NetworkView::new(graph.clone());
            // port A demands 4 for pickup
            let label = Label::new(residual, residual, 0.0);
            let extended = label.extend(&view, arc(&graph, d.source, d.a_pu));
            if residual >= 4 {
                let extended = extended.unwrap();
                prop_assert_eq!(extended.residual_pickup(), residual - 4);
                prop_assert!(extended.residual_delivery() <= extended.residual_pickup());
            } else {
                prop_assert!(extended.is_none());
            }
        }
    }

    #[test]
    fn extension_adds_reduced_cost_and_shrinks_capacity() {
        let d = init_test_data();
        let graph = d.network.graph(d.small);
        let view = NetworkView::new(graph.clone());
        let label = Label::initial(10)
            .extend(&view, arc(&graph, d.source, d.a_de))
            .unwrap();
        // 12 - 25
        assert_eq!(label.reduced_cost(), -13.0);
        assert_eq!(label.residual_pickup(), 10);
        assert_eq!(label.residual_delivery(), 7);

        let label = label.extend(&view, arc(&graph, d.a_de, d.b_pu4)).unwrap();
        assert_eq!(label.residual_pickup(), 2);
        assert_eq!(label.residual_delivery(), 2);
        assert_eq!(label.reduced_cost(), -47.0);
    }

    #[test]
    fn erased_arcs_are_not_extended() {
        let d = init_test_data();
        let graph = d.network.graph(d.small);
        let a = arc(&graph, d.source, d.a_de);
        let view = NetworkView::new(graph.clone()).with_erased([a]);
        assert!(Label::initial(10).extend(&view, a).is_none());
    }

    #[test]
    fn elementary_labels_visit_port_roles_once() {
        let d = init_test_data();
        let graph = d.network.graph(d.small);
        let view = NetworkView::new(graph.clone());
        let initial = Label::initial_elementary(10, 3);
        let at_a = initial
            .extend(&view, arc(&graph, d.source, d.a_de))
            .unwrap();
        let bit = visit_bit(graph.node(d.a_de));
        assert!(!at_a.visitable().unwrap().contains(bit));
        assert!(initial.visitable().unwrap().contains(bit));

        // reaching the sink keeps the set
        let at_sink = at_a.extend(&view, arc(&graph, d.a_de, d.sink)).unwrap();
        assert_eq!(at_sink.visitable(), at_a.visitable());

        // more port-roles left dominates at equal cost and capacity
        let mut fewer = initial.clone();
        fewer.visitable.as_mut().unwrap().set(bit, false);
        assert!(initial.dominates(&fewer));
        assert!(!fewer.dominates(&initial));
    }

    #[test]
    fn cost_tolerance_in_dominance() {
        let a = Label::new(5, 5, -10.0);
        let b = Label::new(5, 5, -10.0005);
        assert!(!a.dominates(&b));
        assert!(!b.dominates(&a));
        assert!(a.is_equivalent(&b));
        let cheaper = Label::new(5, 5, -10.01);
        assert!(cheaper.dominates(&a));
        let roomier = Label::new(6, 5, -9.9995);
        assert!(roomier.dominates(&a));
    }
}
