use model::base_types::{ArcIdx, PortWithType, Speed, VesselClassIdx};
use model::network::graph::VesselGraph;
use solution::Column;
use std::fmt;

use crate::network_view::NetworkView;

const SPEED_TOLERANCE: f64 = 1e-3;

/// A decision taken when branching.
///
/// A rule is enforced by erasing arcs: `erases_arc` decides for every arc of
/// every vessel class graph. `IncludePort` erases nothing; it turns the row of
/// its port-role into an equality instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BranchingRule {
    IncludePort(PortWithType),
    ExcludePort(PortWithType),
    AssignToVessel {
        port: PortWithType,
        vessel_class: VesselClassIdx,
    },
    ForbidToVessel {
        port: PortWithType,
        vessel_class: VesselClassIdx,
    },
    ForceConsecutive {
        vessel_class: VesselClassIdx,
        pred: PortWithType,
        succ: PortWithType,
    },
    ForbidConsecutive {
        vessel_class: VesselClassIdx,
        pred: PortWithType,
        succ: PortWithType,
    },
    ForceSpeed {
        vessel_class: VesselClassIdx,
        pred: PortWithType,
        succ: PortWithType,
        speed: Speed,
    },
    ForbidSpeed {
        vessel_class: VesselClassIdx,
        pred: PortWithType,
        succ: PortWithType,
        speed: Speed,
    },
    ForceArc {
        vessel_class: VesselClassIdx,
        arc: ArcIdx,
    },
    ForbidArc {
        vessel_class: VesselClassIdx,
        arc: ArcIdx,
    },
}

// methods
impl BranchingRule {
    pub fn erases_arc(&self, graph: &VesselGraph, arc: ArcIdx) -> bool {
        let source = graph.node(graph.arc_source(arc));
        let target = graph.node(graph.arc_target(arc));
        let in_class = |vc: &VesselClassIdx| graph.vessel_class() == *vc;
        let touches = |port: &PortWithType| {
            (source.is_regular_port() && source.is_row(*port))
                || (target.is_regular_port() && target.is_row(*port))
        };
        match self {
            BranchingRule::IncludePort(_) => false,
            BranchingRule::ExcludePort(port) => touches(port),
            BranchingRule::AssignToVessel { port, vessel_class } => {
                !in_class(vessel_class) && touches(port)
            }
            BranchingRule::ForbidToVessel { port, vessel_class } => {
                in_class(vessel_class) && touches(port)
            }
            BranchingRule::ForceConsecutive {
                vessel_class,
                pred,
                succ,
            } => {
                in_class(vessel_class)
                    && (source.is_row(*pred) != target.is_row(*succ))
            }
            BranchingRule::ForbidConsecutive {
                vessel_class,
                pred,
                succ,
            } => in_class(vessel_class) && source.is_row(*pred) && target.is_row(*succ),
            BranchingRule::ForceSpeed {
                vessel_class,
                pred,
                succ,
                speed,
            } => {
                in_class(vessel_class)
                    && source.is_row(*pred)
                    && target.is_row(*succ)
                    && (graph.leg(arc).speed() - speed).abs() > SPEED_TOLERANCE
            }
            BranchingRule::ForbidSpeed {
                vessel_class,
                pred,
                succ,
                speed,
            } => {
                in_class(vessel_class)
                    && source.is_row(*pred)
                    && target.is_row(*succ)
                    && (graph.leg(arc).speed() - speed).abs() <= SPEED_TOLERANCE
            }
            BranchingRule::ForceArc {
                vessel_class,
                arc: forced,
            } => {
                if !in_class(vessel_class) || arc == *forced {
                    return false;
                }
                let forced_source = graph.node(graph.arc_source(*forced));
                let forced_target = graph.node(graph.arc_target(*forced));
                (forced_source.is_regular_port() && source.same_row_as(forced_source))
                    || (forced_target.is_regular_port() && target.same_row_as(forced_target))
            }
            BranchingRule::ForbidArc {
                vessel_class,
                arc: forbidden,
            } => in_class(vessel_class) && arc == *forbidden,
        }
    }

    /// the arcs still visible in `view` that this rule hides.
    pub fn erasure_delta(&self, view: &NetworkView) -> Vec<ArcIdx> {
        let graph = view.graph();
        graph
            .arcs()
            .filter(|a| !view.is_erased(*a) && self.erases_arc(graph, *a))
            .collect()
    }

    /// Dummy columns are compatible with every rule. The force rules keep the
    /// columns showing their condition, the forbid rules the others, so the
    /// two children of a decision share no column of the branched class.
    pub fn is_compatible(&self, column: &Column) -> bool {
        let Some(solution) = column.solution() else {
            return true;
        };
        let in_class = |vc: &VesselClassIdx| solution.vessel_class() == *vc;
        match self {
            BranchingRule::IncludePort(_) => true,
            BranchingRule::ExcludePort(port) => !solution.visits_port(*port),
            BranchingRule::AssignToVessel { port, vessel_class } => {
                in_class(vessel_class) || !solution.visits_port(*port)
            }
            BranchingRule::ForbidToVessel { port, vessel_class } => {
                !in_class(vessel_class) || !solution.visits_port(*port)
            }
            BranchingRule::ForceConsecutive {
                vessel_class,
                pred,
                succ,
            } => !in_class(vessel_class) || solution.visits_consecutive_ports(*pred, *succ),
            BranchingRule::ForbidConsecutive {
                vessel_class,
                pred,
                succ,
            } => !in_class(vessel_class) || !solution.visits_consecutive_ports(*pred, *succ),
            BranchingRule::ForceSpeed {
                vessel_class,
                pred,
                succ,
                speed,
            } => {
                !in_class(vessel_class)
                    || solution.visits_consecutive_ports_at_speed(*pred, *succ, *speed)
            }
            BranchingRule::ForbidSpeed {
                vessel_class,
                pred,
                succ,
                speed,
            } => {
                !in_class(vessel_class)
                    || !solution.visits_consecutive_ports_at_speed(*pred, *succ, *speed)
            }
            BranchingRule::ForceArc { vessel_class, arc } => {
                !in_class(vessel_class) || solution.uses_arc(*arc)
            }
            BranchingRule::ForbidArc { vessel_class, arc } => {
                !in_class(vessel_class) || !solution.uses_arc(*arc)
            }
        }
    }

    /// the row that has to be covered exactly once.
    pub fn equality_row(&self) -> Option<PortWithType> {
        match self {
            BranchingRule::IncludePort(port) => Some(*port),
            _ => None,
        }
    }
}

impl fmt::Display for BranchingRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BranchingRule::IncludePort((p, t)) => write!(f, "include p{}-{}", p, t),
            BranchingRule::ExcludePort((p, t)) => write!(f, "exclude p{}-{}", p, t),
            BranchingRule::AssignToVessel {
                port: (p, t),
                vessel_class,
            } => write!(f, "assign p{}-{} to vc{}", p, t, vessel_class),
            BranchingRule::ForbidToVessel {
                port: (p, t),
                vessel_class,
            } => write!(f, "forbid p{}-{} to vc{}", p, t, vessel_class),
            BranchingRule::ForceConsecutive {
                vessel_class,
                pred,
                succ,
            } => write!(
                f,
                "vc{}: force p{}-{} -> p{}-{}",
                vessel_class, pred.0, pred.1, succ.0, succ.1
            ),
            BranchingRule::ForbidConsecutive {
                vessel_class,
                pred,
                succ,
            } => write!(
                f,
                "vc{}: forbid p{}-{} -> p{}-{}",
                vessel_class, pred.0, pred.1, succ.0, succ.1
            ),
            BranchingRule::ForceSpeed {
                vessel_class,
                pred,
                succ,
                speed,
            } => write!(
                f,
                "vc{}: force speed {} on p{}-{} -> p{}-{}",
                vessel_class, speed, pred.0, pred.1, succ.0, succ.1
            ),
            BranchingRule::ForbidSpeed {
                vessel_class,
                pred,
                succ,
                speed,
            } => write!(
                f,
                "vc{}: forbid speed {} on p{}-{} -> p{}-{}",
                vessel_class, speed, pred.0, pred.1, succ.0, succ.1
            ),
            BranchingRule::ForceArc { vessel_class, arc } => {
                write!(f, "vc{}: force arc {}", vessel_class, arc)
            }
            BranchingRule::ForbidArc { vessel_class, arc } => {
                write!(f, "vc{}: forbid arc {}", vessel_class, arc)
            }
        }
    }
}
