use im::{OrdMap, OrdSet};
use model::base_types::{ArcIdx, Cost, NodeIdx, NodeType, PortIdx, PortType, VesselClassIdx};
use model::network::graph::VesselGraph;
use std::collections::HashMap;
use std::sync::Arc;

/// The dual prices of the pickup and delivery row of one port.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PortDual {
    pub pickup: f64,
    pub delivery: f64,
}

impl PortDual {
    pub fn of(&self, port_type: PortType) -> f64 {
        match port_type {
            PortType::Pickup => self.pickup,
            PortType::Delivery => self.delivery,
            PortType::Both => 0.0,
        }
    }
}

pub type PortDuals = Arc<HashMap<PortIdx, PortDual>>;

/// Arcs hidden by branching, grouped by their source vertex.
///
/// Structurally shared between a node and its children; a child only ever adds
/// arcs to the set of its parent.
#[derive(Clone, Default, Debug)]
pub struct ErasedArcs {
    by_source: OrdMap<NodeIdx, OrdSet<ArcIdx>>,
    count: usize,
}

impl ErasedArcs {
    pub fn new() -> ErasedArcs {
        ErasedArcs::default()
    }

    pub fn contains(&self, source: NodeIdx, arc: ArcIdx) -> bool {
        self.by_source
            .get(&source)
            .map(|arcs| arcs.contains(&arc))
            .unwrap_or(false)
    }

    /// returns false if the arc was erased already.
    pub fn insert(&mut self, source: NodeIdx, arc: ArcIdx) -> bool {
        let arcs = self.by_source.entry(source).or_default();
        if arcs.insert(arc).is_some() {
            return false;
        }
        self.count += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// What the pricing sees of one vessel class: the immutable graph, the arcs
/// erased at the current tree node and the duals of the last master solve.
///
/// A view is a value. Installing duals or erasing arcs produces a new view; the
/// graph itself is never touched.
#[derive(Clone)]
pub struct NetworkView {
    graph: Arc<VesselGraph>,
    erased: ErasedArcs,
    port_duals: PortDuals,
    vessel_class_dual: f64,
}

// static functions
impl NetworkView {
    /// nothing erased, all duals zero.
    pub fn new(graph: Arc<VesselGraph>) -> NetworkView {
        NetworkView {
            graph,
            erased: ErasedArcs::new(),
            port_duals: Arc::new(HashMap::new()),
            vessel_class_dual: 0.0,
        }
    }
}

// methods
impl NetworkView {
    pub fn graph(&self) -> &Arc<VesselGraph> {
        &self.graph
    }

    pub fn vessel_class(&self) -> VesselClassIdx {
        self.graph.vessel_class()
    }

    pub fn erased(&self) -> &ErasedArcs {
        &self.erased
    }

    pub fn num_erased(&self) -> usize {
        self.erased.len()
    }

    pub fn is_erased(&self, arc: ArcIdx) -> bool {
        self.erased.contains(self.graph.arc_source(arc), arc)
    }

    pub fn port_duals(&self) -> &PortDuals {
        &self.port_duals
    }

    pub fn vessel_class_dual(&self) -> f64 {
        self.vessel_class_dual
    }

    /// a copy with the given arcs erased additionally.
    pub fn with_erased(&self, arcs: impl IntoIterator<Item = ArcIdx>) -> NetworkView {
        let mut view = self.clone();
        for arc in arcs {
            view.erased.insert(self.graph.arc_source(arc), arc);
        }
        view
    }

    /// a copy using the given duals.
    pub fn with_duals(&self, port_duals: PortDuals, vessel_class_dual: f64) -> NetworkView {
        NetworkView {
            graph: self.graph.clone(),
            erased: self.erased.clone(),
            port_duals,
            vessel_class_dual,
        }
    }

    /// The dual credited when a path enters the node: the row dual for port
    /// calls, the vessel class dual for the sink and nothing otherwise.
    pub fn dual_of(&self, node: NodeIdx) -> f64 {
        let n = self.graph.node(node);
        match n.node_type() {
            NodeType::RegularPort => self
                .port_duals
                .get(&n.port())
                .map(|d| d.of(n.port_type()))
                .unwrap_or(0.0),
            NodeType::Sink => self.vessel_class_dual,
            _ => 0.0,
        }
    }

    pub fn penalty(&self, node: NodeIdx) -> Cost {
        self.graph.penalty(node)
    }

    /// cost of the arc net of the dual and the penalty of its target.
    pub fn reduced_cost(&self, arc: ArcIdx) -> Cost {
        let target = self.graph.arc_target(arc);
        self.graph.leg(arc).cost() - self.dual_of(target) - self.penalty(target)
    }

    pub fn visible_out_arcs(&self, node: NodeIdx) -> impl Iterator<Item = ArcIdx> + '_ {
        self.graph
            .out_arcs(node)
            .filter(move |a| !self.erased.contains(node, *a))
    }

    pub fn visible_in_arcs(&self, node: NodeIdx) -> impl Iterator<Item = ArcIdx> + '_ {
        self.graph.in_arcs(node).filter(move |a| !self.is_erased(*a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solution::test_utilities::{arc, init_test_data};

    #[test]
    fn erasing_only_grows() {
        let d = init_test_data();
        let graph = d.network.graph(d.small);
        let root = NetworkView::new(graph.clone());
        let a = arc(&graph, d.source, d.a_pu);
        let b = arc(&graph, d.a_pu, d.b_de);

        let child = root.with_erased([a]);
        let grandchild = child.with_erased([a, b]);

        assert_eq!(root.num_erased(), 0);
        assert_eq!(child.num_erased(), 1);
        assert_eq!(grandchild.num_erased(), 2);
        assert!(child.is_erased(a));
        assert!(!child.is_erased(b));
        assert!(grandchild.is_erased(a) && grandchild.is_erased(b));
        assert_eq!(child.visible_out_arcs(d.source).count(), 2);
        assert_eq!(root.visible_out_arcs(d.source).count(), 3);
        assert_eq!(grandchild.visible_in_arcs(d.b_de).count(), 1);
    }

    #[test]
    fn duals_are_credited_by_node_type() {
        let d = init_test_data();
        let graph = d.network.graph(d.small);
        let mut duals = HashMap::new();
        duals.insert(
            d.port_a,
            PortDual {
                pickup: 3.0,
                delivery: 7.0,
            },
        );
        let view = NetworkView::new(graph.clone()).with_duals(Arc::new(duals), -2.5);

        assert_eq!(view.dual_of(d.a_pu), 3.0);
        assert_eq!(view.dual_of(d.a_de), 7.0);
        assert_eq!(view.dual_of(d.b_pu4), 0.0);
        assert_eq!(view.dual_of(d.sink), -2.5);
        assert_eq!(view.dual_of(d.source), 0.0);

        // 10 - 3 - 30
        assert_eq!(view.reduced_cost(arc(&graph, d.source, d.a_pu)), -23.0);
        // 11 + 2.5
        assert_eq!(view.reduced_cost(arc(&graph, d.b_de, d.sink)), 13.5);
    }
}
