use model::base_types::{ArcIdx, PortWithType, VesselClassIdx};
use solution::{Column, Solution};
use std::sync::Arc;

use super::rules::BranchingRule;

/// A part of a rotation that leaves a port-role and comes back to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    vessel_class: VesselClassIdx,
    arcs: Vec<ArcIdx>,
    steps: Vec<Step>,
}

/// How one arc of a cycle is branched on.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    /// between two regular port calls: keyed on their rows.
    Succession(PortWithType, PortWithType),
    /// into or out of a comeback hub: keyed on the arc itself, since the hub
    /// row is shared by every return to the hub.
    Arc(ArcIdx),
}

impl Cycle {
    pub fn vessel_class(&self) -> VesselClassIdx {
        self.vessel_class
    }

    pub fn arcs(&self) -> &[ArcIdx] {
        &self.arcs
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// One rule set per arc of the cycle: the arc itself is forbidden, all arcs
    /// before it are forced. No rotation containing the cycle survives in any
    /// of the children.
    pub fn branches(&self) -> Vec<Vec<BranchingRule>> {
        (0..self.steps.len())
            .map(|k| {
                let mut rules: Vec<BranchingRule> =
                    self.steps[..k].iter().map(|step| self.force(*step)).collect();
                rules.push(self.forbid(self.steps[k]));
                rules
            })
            .collect()
    }

    fn force(&self, step: Step) -> BranchingRule {
        let vessel_class = self.vessel_class;
        match step {
            Step::Succession(pred, succ) => BranchingRule::ForceConsecutive {
                vessel_class,
                pred,
                succ,
            },
            Step::Arc(arc) => BranchingRule::ForceArc { vessel_class, arc },
        }
    }

    fn forbid(&self, step: Step) -> BranchingRule {
        let vessel_class = self.vessel_class;
        match step {
            Step::Succession(pred, succ) => BranchingRule::ForbidConsecutive {
                vessel_class,
                pred,
                succ,
            },
            Step::Arc(arc) => BranchingRule::ForbidArc { vessel_class, arc },
        }
    }
}

/// The shortest cycle of the rotation, if it calls some port-role twice.
pub fn shortest_cycle(solution: &Solution) -> Option<Cycle> {
    let graph = solution.graph();
    let arcs = solution.arcs();
    let mut best: Option<(usize, usize)> = None;

    // the last arc enters the sink and closes no cycle
    for j in 0..arcs.len().saturating_sub(1) {
        let target = graph.node(graph.arc_target(arcs[j]));
        if !target.is_regular_port() {
            continue;
        }
        let start = (0..=j).rev().find(|i| {
            let source = graph.node(graph.arc_source(arcs[*i]));
            source.is_regular_port() && source.same_row_as(target)
        });
        if let Some(i) = start {
            let shorter = best.map(|(bi, bj)| j - i < bj - bi).unwrap_or(true);
            if shorter {
                best = Some((i, j));
            }
        }
    }

    best.map(|(i, j)| {
        let arcs: Vec<ArcIdx> = arcs[i..=j].to_vec();
        let steps = arcs
            .iter()
            .map(|a| {
                let source = graph.node(graph.arc_source(*a));
                let target = graph.node(graph.arc_target(*a));
                if source.is_regular_port() && target.is_regular_port() {
                    Step::Succession(source.port_with_type(), target.port_with_type())
                } else {
                    Step::Arc(*a)
                }
            })
            .collect();
        Cycle {
            vessel_class: solution.vessel_class(),
            arcs,
            steps,
        }
    })
}

/// the shortest cycle among the cyclic columns.
pub fn shortest_cycle_among<'a>(columns: impl Iterator<Item = &'a Arc<Column>>) -> Option<Cycle> {
    columns
        .filter(|c| c.has_cycles())
        .filter_map(|c| c.solution().and_then(shortest_cycle))
        .min_by_key(|cycle| cycle.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::{comeback_network, looping_network};
    use solution::test_utilities::{init_test_data, solution_through};
    use solution::ColumnOrigin;

    #[test]
    fn acyclic_rotations_have_no_cycle() {
        let d = init_test_data();
        let solution =
            solution_through(&d.network, d.small, &[d.source, d.a_de, d.b_pu4, d.sink], 0.0);
        assert!(shortest_cycle(&solution).is_none());
    }

    #[test]
    fn the_shortest_cycle_is_found() {
        let l = looping_network();
        // P -> Q -> P -> Q: the first return to P closes a cycle of length 2,
        // the return to Q one of length 2 as well; the first one is kept
        let solution = l.rotation(&[l.source, l.p1, l.q2, l.p3, l.q4, l.sink]);
        let cycle = shortest_cycle(&solution).unwrap();
        assert_eq!(cycle.len(), 2);
        assert_eq!(cycle.arcs(), &solution.arcs()[1..3]);

        let column = Arc::new(Column::new(solution, 1, ColumnOrigin::Exact));
        assert!(column.has_cycles());
        let found = shortest_cycle_among([column.clone()].iter()).unwrap();
        assert_eq!(found, cycle);
    }

    #[test]
    fn every_child_forbids_the_cycle() {
        let l = looping_network();
        let solution = l.rotation(&[l.source, l.p1, l.q2, l.p3, l.sink]);
        let column = Column::new(solution, 1, ColumnOrigin::Exact);
        let cycle = shortest_cycle(column.solution().unwrap()).unwrap();
        let branches = cycle.branches();

        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0].len(), 1);
        assert_eq!(branches[1].len(), 2);
        assert!(matches!(branches[1][0], BranchingRule::ForceConsecutive { .. }));
        for rules in branches.iter() {
            assert!(rules.iter().any(|r| !r.is_compatible(&column)));
        }
    }

    #[test]
    fn returns_to_the_hub_are_branched_on_their_arcs() {
        let c = comeback_network();
        let cyclic = Column::new(
            c.rotation(&[c.source, c.p1, c.comeback, c.p3, c.sink]),
            1,
            ColumnOrigin::Exact,
        );
        let straight = Column::new(c.rotation(&[c.source, c.p1, c.sink]), 1, ColumnOrigin::Exact);
        assert!(cyclic.has_cycles());

        let cycle = shortest_cycle(cyclic.solution().unwrap()).unwrap();
        assert_eq!(cycle.len(), 2);
        let branches = cycle.branches();
        assert_eq!(branches.len(), 2);
        for rules in branches.iter() {
            assert!(rules
                .iter()
                .all(|r| matches!(r, BranchingRule::ForceArc { .. } | BranchingRule::ForbidArc { .. })));
            assert!(rules.iter().any(|r| !r.is_compatible(&cyclic)));
        }
        // the straight rotation survives in exactly one child
        let keeping = branches
            .iter()
            .filter(|rules| rules.iter().all(|r| r.is_compatible(&straight)))
            .count();
        assert_eq!(keeping, 1);
        // and its arcs stay in the graph of that child
        let graph = c.network.graph(VesselClassIdx(0));
        let view = crate::network_view::NetworkView::new(graph);
        let erased: Vec<ArcIdx> = branches[0].iter().flat_map(|r| r.erasure_delta(&view)).collect();
        assert!(straight
            .solution()
            .unwrap()
            .arcs()
            .iter()
            .all(|a| !erased.contains(a)));
    }
}
