use derive_more::Display;
use model::base_types::{ArcType, PortWithType, VesselClassIdx};
use model::ports::Ports;
use solution::Column;
use std::sync::Arc;

use super::cycle::shortest_cycle_among;
use super::rules::BranchingRule;

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchingKind {
    #[display(fmt = "cycle")]
    Cycle,
    #[display(fmt = "port selection")]
    PortSelection,
    #[display(fmt = "vessel assignment")]
    VesselAssignment,
    #[display(fmt = "consecutive visit")]
    ConsecutiveVisit,
    #[display(fmt = "speed")]
    Speed,
    #[display(fmt = "arc")]
    Arc,
}

/// How to split a node: one rule set per child.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchingDecision {
    pub kind: BranchingKind,
    pub children: Vec<Vec<BranchingRule>>,
}

impl BranchingDecision {
    fn two_way(kind: BranchingKind, enforce: BranchingRule, forbid: BranchingRule) -> Self {
        BranchingDecision {
            kind,
            children: vec![vec![enforce], vec![forbid]],
        }
    }
}

/// Picks the branching of a node from its basic columns.
///
/// Cycles in the basis are broken first. Otherwise the first applicable
/// strategy wins: port selection, vessel assignment, consecutive visit, speed
/// and finally arc branching. None if the basis is integral and acyclic.
pub fn select_branching(
    basic: &[(Arc<Column>, f64)],
    ports: &Ports,
    num_vessel_classes: usize,
    tolerance: f64,
) -> Option<BranchingDecision> {
    let basic: Vec<&(Arc<Column>, f64)> = basic.iter().filter(|(c, _)| !c.is_dummy()).collect();

    if let Some(cycle) = shortest_cycle_among(basic.iter().map(|(c, _)| c)) {
        return Some(BranchingDecision {
            kind: BranchingKind::Cycle,
            children: cycle.branches(),
        });
    }

    let fractional = FractionalBasis {
        basic,
        tolerance,
    };
    fractional
        .port_selection(ports)
        .or_else(|| fractional.vessel_assignment(ports, num_vessel_classes))
        .or_else(|| fractional.consecutive_visit())
        .or_else(|| fractional.speed())
        .or_else(|| fractional.arc())
}

struct FractionalBasis<'a> {
    basic: Vec<&'a (Arc<Column>, f64)>,
    tolerance: f64,
}

impl<'a> FractionalBasis<'a> {
    fn is_fractional(&self, value: f64) -> bool {
        let fract = value.fract();
        fract > self.tolerance && fract < 1.0 - self.tolerance
    }

    /// among the fractional values the one closest to one half.
    fn most_fractional<T: Copy>(&self, candidates: impl Iterator<Item = (T, f64)>) -> Option<T> {
        candidates
            .filter(|(_, v)| self.is_fractional(*v))
            .min_by(|(_, a), (_, b)| distance_to_half(*a).total_cmp(&distance_to_half(*b)))
            .map(|(t, _)| t)
    }

    fn port_flow(&self, row: usize, vessel_class: Option<VesselClassIdx>) -> f64 {
        self.basic
            .iter()
            .filter(|(c, _)| vessel_class.is_none() || c.vessel_class() == vessel_class)
            .map(|(c, v)| c.port_coefficient(row) * v)
            .sum()
    }

    fn port_selection(&self, ports: &Ports) -> Option<BranchingDecision> {
        let row = self.most_fractional((0..ports.num_rows()).map(|r| (r, self.port_flow(r, None))))?;
        let port = ports.row_port(row);
        Some(BranchingDecision::two_way(
            BranchingKind::PortSelection,
            BranchingRule::IncludePort(port),
            BranchingRule::ExcludePort(port),
        ))
    }

    fn vessel_assignment(&self, ports: &Ports, num_vessel_classes: usize) -> Option<BranchingDecision> {
        let candidates = (0..ports.num_rows()).flat_map(|row| {
            (0..num_vessel_classes).map(move |vc| (row, VesselClassIdx(vc as u32)))
        });
        let (row, vessel_class) = self.most_fractional(
            candidates.map(|(row, vc)| ((row, vc), self.port_flow(row, Some(vc)))),
        )?;
        let port = ports.row_port(row);
        Some(BranchingDecision::two_way(
            BranchingKind::VesselAssignment,
            BranchingRule::AssignToVessel { port, vessel_class },
            BranchingRule::ForbidToVessel { port, vessel_class },
        ))
    }

    fn most_fractional_column(&self) -> Option<usize> {
        self.most_fractional(self.basic.iter().enumerate().map(|(i, (_, v))| (i, *v)))
    }

    /// the other basic columns of the same vessel class as column `i`.
    fn siblings(&self, i: usize) -> impl Iterator<Item = &Column> + '_ {
        let vessel_class = self.basic[i].0.vessel_class();
        self.basic
            .iter()
            .enumerate()
            .filter(move |(j, (c, _))| *j != i && c.vessel_class() == vessel_class)
            .map(|(_, (c, _))| c.as_ref())
    }

    /// every other basic column, whatever its vessel class.
    fn others(&self, i: usize) -> impl Iterator<Item = &Column> + '_ {
        self.basic
            .iter()
            .enumerate()
            .filter(move |(j, _)| *j != i)
            .map(|(_, (c, _))| c.as_ref())
    }

    /// The succession is taken from the most fractional column when it has
    /// one, otherwise from the column it is compared with; the rules act on
    /// the vessel class of the column the succession belongs to.
    fn consecutive_visit(&self) -> Option<BranchingDecision> {
        let i = self.most_fractional_column()?;
        let solution = self.basic[i].0.solution()?;
        let (vessel_class, pred, succ) = self.others(i).find_map(|other| {
            let other = other.solution()?;
            solution
                .common_port_visited_from_two_different_predecessors(other)
                .map(|(pred, succ)| (solution.vessel_class(), pred, succ))
                .or_else(|| {
                    other
                        .common_port_visited_from_two_different_predecessors(solution)
                        .map(|(pred, succ)| (other.vessel_class(), pred, succ))
                })
        })?;
        Some(BranchingDecision::two_way(
            BranchingKind::ConsecutiveVisit,
            BranchingRule::ForceConsecutive {
                vessel_class,
                pred,
                succ,
            },
            BranchingRule::ForbidConsecutive {
                vessel_class,
                pred,
                succ,
            },
        ))
    }

    fn speed(&self) -> Option<BranchingDecision> {
        let i = self.most_fractional_column()?;
        let solution = self.basic[i].0.solution()?;
        let (pred, succ, speed) = self.siblings(i).find_map(|other| {
            solution.common_port_succession_at_two_different_speeds(other.solution()?)
        })?;
        let vessel_class = solution.vessel_class();
        Some(BranchingDecision::two_way(
            BranchingKind::Speed,
            BranchingRule::ForceSpeed {
                vessel_class,
                pred,
                succ,
                speed,
            },
            BranchingRule::ForbidSpeed {
                vessel_class,
                pred,
                succ,
                speed,
            },
        ))
    }

    fn arc(&self) -> Option<BranchingDecision> {
        let i = self.most_fractional_column()?;
        let solution = self.basic[i].0.solution()?;
        let graph = solution.graph();
        let arc = solution
            .arcs()
            .iter()
            .copied()
            .find(|a| graph.leg(*a).arc_type() == ArcType::PortToPort)
            .or_else(|| solution.arcs().first().copied())?;
        let vessel_class = solution.vessel_class();
        Some(BranchingDecision::two_way(
            BranchingKind::Arc,
            BranchingRule::ForceArc { vessel_class, arc },
            BranchingRule::ForbidArc { vessel_class, arc },
        ))
    }
}

fn distance_to_half(value: f64) -> f64 {
    (value.fract() - 0.5).abs()
}
