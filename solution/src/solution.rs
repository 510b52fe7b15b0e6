
use itertools::Itertools;
use model::base_types::{
    ArcIdx, Cost, Distance, NodeIdx, PortType, PortWithType, Quantity, Speed, VesselClassIdx,
    HUB,
};
use model::network::graph::VesselGraph;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::solution_costs::SolutionCosts;

const SPEED_TOLERANCE: f64 = 1e-6;
const COST_TOLERANCE: f64 = 1e-6;

/// A source-to-sink path in the graph of one vessel class, i.e., one vessel
/// rotation.
///
/// The arcs are stored in travel order (first arc leaves the source, last arc
/// enters the sink). The reduced cost is the one computed when the path was
/// priced and is not updated afterwards.
#[derive(Clone)]
pub struct Solution {
    arcs: Vec<ArcIdx>,
    cost: Cost,
    reduced_cost: Cost,
    graph: Arc<VesselGraph>,
}

// static functions
impl Solution {
    pub fn new(arcs: Vec<ArcIdx>, reduced_cost: Cost, graph: Arc<VesselGraph>) -> Solution {
        Solution {
            cost: graph.path_cost(&arcs),
            arcs,
            reduced_cost,
            graph,
        }
    }
}

// methods
impl Solution {
    pub fn vessel_class(&self) -> VesselClassIdx {
        self.graph.vessel_class()
    }

    pub fn arcs(&self) -> &[ArcIdx] {
        &self.arcs
    }

    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn reduced_cost(&self) -> Cost {
        self.reduced_cost
    }

    pub fn graph(&self) -> &Arc<VesselGraph> {
        &self.graph
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// all vertices of the path starting with the source.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.arcs
            .first()
            .map(|a| self.graph.arc_source(*a))
            .into_iter()
            .chain(self.arcs.iter().map(|a| self.graph.arc_target(*a)))
    }

    /// regular port calls in travel order.
    pub fn port_calls(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        self.arcs
            .iter()
            .map(|a| self.graph.arc_target(*a))
            .filter(|v| self.graph.node(*v).is_regular_port())
    }

    /// The rotation is split into legs at comeback hubs. On each leg all cargo to
    /// be delivered is on board when leaving the hub; the load may never exceed
    /// the capacity once the pickups are loaded.
    pub fn satisfies_capacity_constraints(&self, capacity: Quantity) -> bool {
        let targets: Vec<NodeIdx> = self
            .arcs
            .iter()
            .map(|a| self.graph.arc_target(*a))
            .collect();

        for leg in targets.split_inclusive(|v| self.graph.node(*v).is_comeback_hub()) {
            let delivered: Quantity = leg.iter().map(|v| self.graph.delivery_demand(*v)).sum();
            if delivered > capacity {
                return false;
            }
            let mut used_capacity = delivered;
            for v in leg {
                used_capacity -= self.graph.delivery_demand(*v);
                let pickup = self.graph.pickup_demand(*v);
                if used_capacity + pickup > capacity {
                    return false;
                }
                used_capacity += pickup;
            }
        }
        true
    }

    pub fn length(&self) -> Distance {
        self.arcs.iter().map(|a| self.graph.leg(*a).length()).sum()
    }

    pub fn n_ports_visited(&self) -> usize {
        self.port_calls().count()
    }

    /// the highest load on board relative to the capacity, counting pickups as
    /// loaded and deliveries as unloaded.
    pub fn highest_load_efficiency(&self, capacity: Quantity) -> f64 {
        if capacity == 0 {
            return 0.0;
        }
        let mut highest = 0.0;
        let mut current = 0.0;
        for v in self.arcs.iter().map(|a| self.graph.arc_target(*a)) {
            match self.graph.node(v).port_type() {
                PortType::Pickup => current += self.graph.pickup_demand(v) as f64,
                PortType::Delivery => current -= self.graph.delivery_demand(v) as f64,
                PortType::Both => {}
            }
            if current > highest {
                highest = current;
            }
        }
        highest / capacity as f64
    }

    /// for every port call the distance its cargo travels on the vessel: picked up
    /// cargo stays on board until the end of the rotation, delivered cargo has been
    /// on board since the start.
    pub fn cargo_travel_distances(&self) -> Vec<Distance> {
        let total = self.length();
        let mut current_distance = 0.0;
        let mut distances = Vec::new();
        for arc in self.arcs.iter() {
            current_distance += self.graph.leg(*arc).length();
            let destination = self.graph.node(self.graph.arc_target(*arc));
            if destination.is_regular_port() {
                match destination.port_type() {
                    PortType::Pickup => distances.push(total - current_distance),
                    _ => distances.push(current_distance),
                }
            }
        }
        distances
    }

    pub fn legs_distance(&self) -> Vec<Distance> {
        self.arcs.iter().map(|a| self.graph.leg(*a).length()).collect()
    }

    /// effective sailing speed per arc: length over the time between leaving the
    /// origin and starting the handling at the destination. Arcs without sailing
    /// time report their nominal speed.
    pub fn legs_speed(&self) -> Vec<Speed> {
        self.arcs
            .iter()
            .map(|a| {
                let source = self.graph.node(self.graph.arc_source(*a)).time_step();
                let target = self.graph.arc_target(*a);
                let arrival = self.graph.node(target).time_step();
                let sailing = arrival as i64 - self.graph.handling_time(target) as i64 - source as i64;
                if sailing > 0 {
                    self.graph.leg(*a).length() / sailing as f64
                } else {
                    self.graph.leg(*a).speed()
                }
            })
            .collect()
    }

    pub fn solution_costs(&self) -> SolutionCosts {
        let mut costs = SolutionCosts::default();
        for arc in self.arcs.iter() {
            costs.add_leg(self.graph.leg(*arc).costs());
        }
        costs
    }

    pub fn uses_arc(&self, arc: ArcIdx) -> bool {
        self.arcs.contains(&arc)
    }

    pub fn visits_port(&self, port: PortWithType) -> bool {
        self.nodes().any(|v| self.graph.node(v).is_row(port))
    }

    pub fn visits_consecutive_ports(&self, pred: PortWithType, succ: PortWithType) -> bool {
        self.consecutive_pairs()
            .any(|(from, to, _)| from == pred && to == succ)
    }

    pub fn visits_consecutive_ports_at_speed(
        &self,
        pred: PortWithType,
        succ: PortWithType,
        speed: Speed,
    ) -> bool {
        self.consecutive_pairs().any(|(from, to, s)| {
            from == pred && to == succ && (s - speed).abs() < SPEED_TOLERANCE
        })
    }

    /// for every visited regular port-role, the port-roles visited immediately
    /// before it (more than one if the rotation visits it more than once).
    pub fn visited_ports_with_predecessors(&self) -> BTreeMap<PortWithType, Vec<PortWithType>> {
        let mut visited: BTreeMap<PortWithType, Vec<PortWithType>> = BTreeMap::new();
        for arc in self.arcs.iter() {
            let target = self.graph.node(self.graph.arc_target(*arc));
            if target.is_regular_port() {
                let source = self.graph.node(self.graph.arc_source(*arc));
                visited
                    .entry(target.port_with_type())
                    .or_default()
                    .push(source.port_with_type());
            }
        }
        visited
    }

    /// if both rotations visit a port-role and this one arrives there from a
    /// port call the other never uses as predecessor, returns (predecessor,
    /// port-role). Arrivals from the hub are not considered.
    pub fn common_port_visited_from_two_different_predecessors(
        &self,
        other: &Solution,
    ) -> Option<(PortWithType, PortWithType)> {
        let other_ports = other.visited_ports_with_predecessors();
        for (successor, predecessors) in self.visited_ports_with_predecessors() {
            let Some(other_predecessors) = other_ports.get(&successor) else {
                continue;
            };
            if let Some(pred) = predecessors
                .iter()
                .find(|p| p.0 != HUB && !other_predecessors.contains(p))
            {
                return Some((*pred, successor));
            }
        }
        None
    }

    /// if both rotations sail between the same two port-roles but at different
    /// speeds, returns the two port-roles and the speed used by this rotation.
    pub fn common_port_succession_at_two_different_speeds(
        &self,
        other: &Solution,
    ) -> Option<(PortWithType, PortWithType, Speed)> {
        for (from, to, speed) in self.consecutive_pairs() {
            let other_speed = other
                .consecutive_pairs()
                .any(|(o_from, o_to, o_speed)| {
                    o_from == from && o_to == to && (o_speed - speed).abs() >= SPEED_TOLERANCE
                });
            if other_speed {
                return Some((from, to, speed));
            }
        }
        None
    }
}

// private methods
impl Solution {
    fn consecutive_pairs(&self) -> impl Iterator<Item = (PortWithType, PortWithType, Speed)> + '_ {
        self.arcs.iter().map(|a| {
            (
                self.graph.node(self.graph.arc_source(*a)).port_with_type(),
                self.graph.node(self.graph.arc_target(*a)).port_with_type(),
                self.graph.leg(*a).speed(),
            )
        })
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Solution) -> bool {
        self.vessel_class() == other.vessel_class()
            && self.arcs.len() == other.arcs.len()
            && (self.cost - other.cost).abs() <= COST_TOLERANCE
            && self
                .arcs
                .iter()
                .zip(other.arcs.iter())
                .all(|(a, b)| {
                    self.graph.node(self.graph.arc_source(*a))
                        == other.graph.node(other.graph.arc_source(*b))
                })
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "vc{} (cost: {:.2}, reduced cost: {:.2}): {}",
            self.vessel_class(),
            self.cost,
            self.reduced_cost,
            self.nodes().map(|v| self.graph.node(v)).join(" - ")
        )
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}
