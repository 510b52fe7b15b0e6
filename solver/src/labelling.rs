use model::base_types::{ArcIdx, NodeIdx, Quantity};
use solution::Solution;
use std::collections::VecDeque;

use crate::label::Label;
use crate::network_view::NetworkView;

type LabelId = usize;

struct LabelRecord {
    label: Label,
    node: NodeIdx,
    predecessor: Option<(LabelId, ArcIdx)>,
    alive: bool, // false once dominated
}

/// Label-setting search for negative reduced cost source-to-sink paths under
/// the pickup and delivery capacity of one vessel class.
///
/// Labels live in an arena and refer to their predecessor by index; evicting a
/// dominated label only marks it, so the paths of its descendants stay intact.
pub struct LabelSetting<'a> {
    view: &'a NetworkView,
    capacity: Quantity,
    elementary: bool,
}

/// Counters of one search.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LabellingReport {
    pub created: usize,
    pub rejected: usize, // dominated on arrival
    pub evicted: usize,
    pub extended: usize,
}

// static functions
impl<'a> LabelSetting<'a> {
    pub fn new(view: &'a NetworkView, capacity: Quantity) -> LabelSetting<'a> {
        LabelSetting {
            view,
            capacity,
            elementary: false,
        }
    }

    /// every port-role may be visited at most once per path.
    pub fn elementary(view: &'a NetworkView, capacity: Quantity) -> LabelSetting<'a> {
        LabelSetting {
            view,
            capacity,
            elementary: true,
        }
    }
}

// methods
impl<'a> LabelSetting<'a> {
    /// all Pareto-optimal paths, one per undominated label at the sink.
    pub fn run(&self) -> Vec<Solution> {
        self.run_with_report().0
    }

    pub fn run_with_report(&self) -> (Vec<Solution>, LabellingReport) {
        let graph = self.view.graph();
        let mut report = LabellingReport::default();
        let mut arena: Vec<LabelRecord> = Vec::new();
        let mut at_node: Vec<Vec<LabelId>> = vec![Vec::new(); graph.num_nodes()];
        let mut frontier: VecDeque<LabelId> = VecDeque::new();

        let initial = if self.elementary {
            Label::initial_elementary(self.capacity, graph.ports().len())
        } else {
            Label::initial(self.capacity)
        };
        arena.push(LabelRecord {
            label: initial,
            node: graph.source(),
            predecessor: None,
            alive: true,
        });
        at_node[graph.source().idx()].push(0);
        frontier.push_back(0);
        report.created += 1;

        let sink = graph.sink();
        while let Some(id) = frontier.pop_front() {
            if !arena[id].alive {
                continue;
            }
            let node = arena[id].node;
            if node == sink {
                continue;
            }
            report.extended += 1;
            for arc in self.view.visible_out_arcs(node) {
                let Some(label) = arena[id].label.extend(self.view, arc) else {
                    continue;
                };
                let target = graph.arc_target(arc);
                let bucket = &mut at_node[target.idx()];

                if bucket.iter().any(|other| {
                    let existing = &arena[*other].label;
                    existing.dominates(&label) || existing.is_equivalent(&label)
                }) {
                    report.rejected += 1;
                    continue;
                }

                bucket.retain(|other| {
                    if label.dominates(&arena[*other].label) {
                        arena[*other].alive = false;
                        report.evicted += 1;
                        false
                    } else {
                        true
                    }
                });

                let new_id = arena.len();
                arena.push(LabelRecord {
                    label,
                    node: target,
                    predecessor: Some((id, arc)),
                    alive: true,
                });
                bucket.push(new_id);
                frontier.push_back(new_id);
                report.created += 1;
            }
        }

        let solutions = at_node[sink.idx()]
            .iter()
            .map(|id| {
                Solution::new(
                    Self::path_to(&arena, *id),
                    arena[*id].label.reduced_cost(),
                    graph.clone(),
                )
            })
            .collect();
        (solutions, report)
    }
}

// private methods
impl<'a> LabelSetting<'a> {
    fn path_to(arena: &[LabelRecord], id: LabelId) -> Vec<ArcIdx> {
        let mut arcs = Vec::new();
        let mut current = id;
        while let Some((predecessor, arc)) = arena[current].predecessor {
            arcs.push(arc);
            current = predecessor;
        }
        arcs.reverse();
        arcs
    }
}
