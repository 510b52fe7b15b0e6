use model::config::PortRowSense;
use model::network::Network;
use model::ports::Ports;
use model::vessel_classes::VesselClasses;
use solution::{Column, ColumnPool};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use crate::branching::BranchingRule;
use crate::master::RowLayout;
use crate::network_view::NetworkView;

/// A node of the branch-and-price tree.
///
/// The rules are all branching decisions on the path from the root; the
/// views already hide the arcs they forbid and the pool only holds columns
/// compatible with them.
pub struct BranchNode {
    number: usize,
    depth: usize,
    father_lb: Option<f64>, // None for the root
    views: Vec<NetworkView>,
    pool: ColumnPool,
    rules: Vec<BranchingRule>,
}

// static functions
impl BranchNode {
    /// the root works on the full graphs with the dummy column only.
    pub fn root(network: &Network, dummy_column_price: f64) -> BranchNode {
        let mut pool = ColumnPool::new();
        pool.push(Arc::new(Column::dummy(
            &network.ports(),
            network.vessel_classes().len(),
            dummy_column_price,
        )));
        BranchNode {
            number: 0,
            depth: 0,
            father_lb: None,
            views: network.graphs().map(|g| NetworkView::new(g.clone())).collect(),
            pool,
            rules: Vec::new(),
        }
    }
}

// methods
impl BranchNode {
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn father_lb(&self) -> Option<f64> {
        self.father_lb
    }

    pub fn is_root(&self) -> bool {
        self.father_lb.is_none()
    }

    pub fn views(&self) -> &[NetworkView] {
        &self.views
    }

    pub fn pool(&self) -> &ColumnPool {
        &self.pool
    }

    pub fn add_column(&mut self, column: Arc<Column>) {
        self.pool.push(column);
    }

    /// replaces the views, e.g. after installing new duals.
    pub fn set_views(&mut self, views: Vec<NetworkView>) {
        self.views = views;
    }

    pub fn rules(&self) -> &[BranchingRule] {
        &self.rules
    }

    /// The child enforcing `new_rules` on top of the rules of this node. Its
    /// pool drops the columns violating one of them.
    pub fn child(&self, number: usize, father_lb: f64, new_rules: Vec<BranchingRule>) -> BranchNode {
        let views = self
            .views
            .iter()
            .map(|view| {
                view.with_erased(
                    new_rules
                        .iter()
                        .flat_map(|rule| rule.erasure_delta(view))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();
        let pool = self
            .pool
            .filtered(|c| new_rules.iter().all(|rule| rule.is_compatible(c)));
        let mut rules = self.rules.clone();
        rules.extend(new_rules);
        BranchNode {
            number,
            depth: self.depth + 1,
            father_lb: Some(father_lb),
            views,
            pool,
            rules,
        }
    }

    pub fn row_layout(
        &self,
        ports: &Ports,
        vessel_classes: &VesselClasses,
        sense: PortRowSense,
    ) -> RowLayout {
        self.rules
            .iter()
            .filter_map(|rule| rule.equality_row())
            .fold(RowLayout::new(ports, vessel_classes, sense), |layout, row| {
                layout.with_equality(row)
            })
    }
}

/// Open nodes, best first: the root, then the smallest father bound, ties
/// broken by the lower node number.
#[derive(Default)]
pub struct NodeQueue {
    heap: BinaryHeap<QueuedNode>,
}

impl NodeQueue {
    pub fn new() -> NodeQueue {
        NodeQueue::default()
    }

    pub fn push(&mut self, node: BranchNode) {
        self.heap.push(QueuedNode(node));
    }

    pub fn pop(&mut self) -> Option<BranchNode> {
        self.heap.pop().map(|q| q.0)
    }

    /// the father bound of the next node; None for the root or an empty queue.
    pub fn best_father_lb(&self) -> Option<f64> {
        self.heap.peek().and_then(|q| q.0.father_lb)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

struct QueuedNode(BranchNode);

impl QueuedNode {
    fn key(&self) -> f64 {
        self.0.father_lb.unwrap_or(f64::NEG_INFINITY)
    }
}

impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    // BinaryHeap is a max-heap: the smaller bound is the greater node
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key()
            .total_cmp(&self.key())
            .then_with(|| other.0.number.cmp(&self.0.number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::base_types::PortType;
    use solution::test_utilities::{init_test_data, solution_through};
    use solution::ColumnOrigin;
    use crate::master::RowBound;

    #[test]
    fn root_holds_the_dummy_column() {
        let d = init_test_data();
        let root = BranchNode::root(&d.network, 1e8);
        assert!(root.is_root());
        assert_eq!(root.pool().len(), 1);
        assert!(root.pool().get(0).unwrap().is_dummy());
        assert_eq!(root.views().len(), 2);
        assert!(root.views().iter().all(|v| v.num_erased() == 0));
    }

    #[test]
    fn children_inherit_rules_and_compatible_columns() {
        let d = init_test_data();
        let mut root = BranchNode::root(&d.network, 1e8);
        let visits_a_de =
            solution_through(&d.network, d.small, &[d.source, d.a_de, d.b_pu4, d.sink], 0.0);
        let visits_a_pu = solution_through(&d.network, d.small, &[d.source, d.a_pu, d.sink], 0.0);
        root.add_column(Arc::new(Column::new(visits_a_de, 2, ColumnOrigin::Exact)));
        root.add_column(Arc::new(Column::new(visits_a_pu, 2, ColumnOrigin::Exact)));

        let a_de = (d.port_a, PortType::Delivery);
        let excluded = root.child(1, 10.0, vec![BranchingRule::ExcludePort(a_de)]);
        assert_eq!(excluded.depth(), 1);
        assert_eq!(excluded.father_lb(), Some(10.0));
        assert_eq!(excluded.pool().len(), 2); // dummy and the A pickup
        assert!(excluded.views()[0].num_erased() > 0);

        let included = root.child(2, 10.0, vec![BranchingRule::IncludePort(a_de)]);
        let grandchild = included.child(
            3,
            12.0,
            vec![BranchingRule::ExcludePort((d.port_b, PortType::Pickup))],
        );
        assert_eq!(grandchild.rules().len(), 2);
        assert_eq!(grandchild.depth(), 2);
        assert!(grandchild.views()[0].num_erased() >= included.views()[0].num_erased());

        let layout = grandchild.row_layout(
            &d.network.ports(),
            &d.network.vessel_classes(),
            PortRowSense::AtLeastOne,
        );
        assert_eq!(layout.port_rows()[2].1, RowBound::Exactly(1.0));
        assert_eq!(layout.port_rows()[0].1, RowBound::AtLeast(1.0));
    }

    #[test]
    fn queue_pops_best_bound_first() {
        let d = init_test_data();
        let root = BranchNode::root(&d.network, 1e8);
        let a = root.child(1, 20.0, vec![]);
        let b = root.child(2, 10.0, vec![]);
        let c = root.child(3, 10.0, vec![]);

        let mut queue = NodeQueue::new();
        queue.push(a);
        queue.push(c);
        queue.push(b);
        assert_eq!(queue.best_father_lb(), Some(10.0));
        queue.push(root);
        assert_eq!(queue.best_father_lb(), None);

        let order: Vec<usize> = std::iter::from_fn(|| queue.pop().map(|n| n.number())).collect();
        assert_eq!(order, vec![0, 2, 3, 1]);
        assert!(queue.is_empty());
    }
}
