use std::collections::HashMap;

use crate::base_types::{
    Cost, PortIdx, PortType, PortWithType, Quantity, TimeStep, VesselClassIdx, HUB,
};
use crate::err::ModelError;

pub struct Ports {
    ports: Vec<Port>,
}

impl Ports {
    /// the first port has to be the hub and no other port may be one.
    pub fn new(ports: Vec<Port>) -> Result<Ports, ModelError> {
        match ports.first() {
            Some(hub) if hub.is_hub() => {}
            Some(other) => return Err(ModelError::InvalidHub(other.name.clone())),
            None => return Err(ModelError::InvalidHub(String::from("<no ports>"))),
        }
        if let Some(second_hub) = ports.iter().skip(1).find(|p| p.is_hub()) {
            return Err(ModelError::InvalidHub(second_hub.name.clone()));
        }
        Ok(Ports { ports })
    }

    pub fn get(&self, idx: PortIdx) -> Option<&Port> {
        self.ports.get(idx.idx())
    }

    /// panics if the port does not exist.
    pub fn port(&self, idx: PortIdx) -> &Port {
        &self.ports[idx.idx()]
    }

    pub fn hub(&self) -> &Port {
        &self.ports[HUB.idx()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Port> + '_ {
        self.ports.iter()
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn idx_of(&self, name: &str) -> Option<PortIdx> {
        self.ports.iter().find(|p| p.name == name).map(|p| p.idx)
    }

    /// number of (port, role) rows of the master problem: every port but the hub,
    /// once as pickup and once as delivery.
    pub fn num_rows(&self) -> usize {
        2 * (self.ports.len() - 1)
    }

    /// pickup rows come first (index `i - 1` for port `i`), then the delivery rows
    /// (index `(n - 1) + i - 1`). The hub has no row.
    pub fn row_of(&self, port: PortIdx, port_type: PortType) -> Option<usize> {
        if port == HUB || port.idx() >= self.ports.len() {
            return None;
        }
        match port_type {
            PortType::Pickup => Some(port.idx() - 1),
            PortType::Delivery => Some(self.ports.len() - 1 + port.idx() - 1),
            PortType::Both => None,
        }
    }

    /// inverse of row_of.
    pub fn row_port(&self, row: usize) -> PortWithType {
        let n = self.ports.len() - 1;
        if row < n {
            (PortIdx(row as u32 + 1), PortType::Pickup)
        } else {
            (PortIdx((row - n) as u32 + 1), PortType::Delivery)
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = PortWithType> + '_ {
        (0..self.num_rows()).map(|row| self.row_port(row))
    }

    pub fn all_penalties(&self) -> Cost {
        self.ports
            .iter()
            .map(|p| p.pickup_penalty + p.delivery_penalty)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    idx: PortIdx,
    name: String,
    hub: bool,
    pickup_demand: Quantity,
    delivery_demand: Quantity,
    pickup_transit: TimeStep,
    delivery_transit: TimeStep,
    pickup_handling: TimeStep,
    delivery_handling: TimeStep,
    pickup_revenue: Cost,
    delivery_revenue: Cost,
    pickup_penalty: Cost,
    delivery_penalty: Cost,
    fixed_fee: Cost,
    variable_fees: HashMap<VesselClassIdx, Cost>,
    movement_costs: HashMap<VesselClassIdx, Cost>,
    allowed_vessel_classes: Vec<VesselClassIdx>,
    closing_time_windows: Vec<(TimeStep, TimeStep)>,
}

impl Port {
    pub fn new(idx: PortIdx, name: String, hub: bool) -> Port {
        Port {
            idx,
            name,
            hub,
            pickup_demand: 0,
            delivery_demand: 0,
            pickup_transit: 0,
            delivery_transit: 0,
            pickup_handling: 0,
            delivery_handling: 0,
            pickup_revenue: 0.0,
            delivery_revenue: 0.0,
            pickup_penalty: 0.0,
            delivery_penalty: 0.0,
            fixed_fee: 0.0,
            variable_fees: HashMap::new(),
            movement_costs: HashMap::new(),
            allowed_vessel_classes: Vec::new(),
            closing_time_windows: Vec::new(),
        }
    }

    pub fn with_pickup(
        mut self,
        demand: Quantity,
        transit: TimeStep,
        handling: TimeStep,
        revenue: Cost,
        penalty: Cost,
    ) -> Port {
        self.pickup_demand = demand;
        self.pickup_transit = transit;
        self.pickup_handling = handling;
        self.pickup_revenue = revenue;
        self.pickup_penalty = penalty;
        self
    }

    pub fn with_delivery(
        mut self,
        demand: Quantity,
        transit: TimeStep,
        handling: TimeStep,
        revenue: Cost,
        penalty: Cost,
    ) -> Port {
        self.delivery_demand = demand;
        self.delivery_transit = transit;
        self.delivery_handling = handling;
        self.delivery_revenue = revenue;
        self.delivery_penalty = penalty;
        self
    }

    pub fn with_fees(
        mut self,
        fixed_fee: Cost,
        variable_fees: HashMap<VesselClassIdx, Cost>,
        movement_costs: HashMap<VesselClassIdx, Cost>,
    ) -> Port {
        self.fixed_fee = fixed_fee;
        self.variable_fees = variable_fees;
        self.movement_costs = movement_costs;
        self
    }

    pub fn with_allowed_vessel_classes(mut self, vessel_classes: Vec<VesselClassIdx>) -> Port {
        self.allowed_vessel_classes = vessel_classes;
        self
    }

    pub fn with_closing_time_windows(mut self, windows: Vec<(TimeStep, TimeStep)>) -> Port {
        self.closing_time_windows = windows;
        self
    }
}

// methods
impl Port {
    pub fn idx(&self) -> PortIdx {
        self.idx
    }

    pub fn name(&self) -> &String {
        &self.name
    }

    pub fn is_hub(&self) -> bool {
        self.hub
    }

    pub fn demand(&self, port_type: PortType) -> Quantity {
        match port_type {
            PortType::Pickup => self.pickup_demand,
            PortType::Delivery => self.delivery_demand,
            PortType::Both => 0,
        }
    }

    pub fn penalty(&self, port_type: PortType) -> Cost {
        match port_type {
            PortType::Pickup => self.pickup_penalty,
            PortType::Delivery => self.delivery_penalty,
            PortType::Both => 0.0,
        }
    }

    pub fn revenue(&self, port_type: PortType) -> Cost {
        match port_type {
            PortType::Pickup => self.pickup_revenue,
            PortType::Delivery => self.delivery_revenue,
            PortType::Both => 0.0,
        }
    }

    pub fn handling(&self, port_type: PortType) -> TimeStep {
        match port_type {
            PortType::Pickup => self.pickup_handling,
            PortType::Delivery => self.delivery_handling,
            PortType::Both => 0,
        }
    }

    pub fn transit(&self, port_type: PortType) -> TimeStep {
        match port_type {
            PortType::Pickup => self.pickup_transit,
            PortType::Delivery => self.delivery_transit,
            PortType::Both => 0,
        }
    }

    pub fn fixed_fee(&self) -> Cost {
        self.fixed_fee
    }

    pub fn variable_fee(&self, vessel_class: VesselClassIdx) -> Cost {
        self.variable_fees.get(&vessel_class).copied().unwrap_or(0.0)
    }

    pub fn movement_cost(&self, vessel_class: VesselClassIdx) -> Cost {
        self.movement_costs.get(&vessel_class).copied().unwrap_or(0.0)
    }

    pub fn allows(&self, vessel_class: VesselClassIdx) -> bool {
        self.allowed_vessel_classes.contains(&vessel_class)
    }

    pub fn closing_time_windows(&self) -> &[(TimeStep, TimeStep)] {
        &self.closing_time_windows
    }

    /// ports whose names share the first five characters model the same physical port.
    pub fn models_same_port_as(&self, other: &Port) -> bool {
        let prefix: String = self.name.chars().take(5).collect();
        let other_prefix: String = other.name.chars().take(5).collect();
        prefix == other_prefix
    }

    /// the time step at which a vessel arriving at `arrival_time` is done with the
    /// port: arrival plus handling, pushed past every closing time window `(t1, t2]`
    /// it falls into, capped at the last time step.
    ///
    /// Overlapping windows can push the time repeatedly. The number of passes is
    /// bounded by the number of windows plus one; every effective pass moves the
    /// time forward past one window.
    pub fn final_time(
        &self,
        arrival_time: TimeStep,
        port_type: PortType,
        num_times: TimeStep,
    ) -> Result<TimeStep, ModelError> {
        let mut final_time = arrival_time + self.handling(port_type);
        let max_passes = self.closing_time_windows.len() + 1;
        let mut settled = false;
        for _ in 0..max_passes {
            let mut moved = false;
            for &(t1, t2) in self.closing_time_windows.iter() {
                if final_time <= t2 && final_time > t1 {
                    final_time += t2 - t1;
                    moved = true;
                }
            }
            if !moved {
                settled = true;
                break;
            }
        }
        if !settled {
            return Err(ModelError::UnsettledTimeWindows(
                self.name.clone(),
                arrival_time,
            ));
        }
        Ok(final_time.min(num_times.saturating_sub(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port_with_windows(windows: Vec<(TimeStep, TimeStep)>) -> Port {
        Port::new(PortIdx(1), String::from("PortX"), false)
            .with_pickup(3, 0, 1, 0.0, 10.0)
            .with_closing_time_windows(windows)
    }

    #[test]
    fn final_time_skips_closing_windows() {
        let port = port_with_windows(vec![(2, 4)]);
        assert_eq!(port.final_time(0, PortType::Pickup, 10).unwrap(), 1);
        // 2 + 1 = 3 falls into (2, 4]
        assert_eq!(port.final_time(2, PortType::Pickup, 10).unwrap(), 5);
        // delivery has no handling time, 2 is not inside (2, 4]
        assert_eq!(port.final_time(2, PortType::Delivery, 10).unwrap(), 2);
    }

    #[test]
    fn final_time_chains_windows_and_caps() {
        let port = port_with_windows(vec![(5, 7), (2, 4)]);
        // 3 -> 5 (second window), then stays since 5 is not inside (5, 7]
        assert_eq!(port.final_time(2, PortType::Pickup, 20).unwrap(), 5);
        let port = port_with_windows(vec![(5, 8), (2, 6)]);
        // 3 -> 7 -> 10
        assert_eq!(port.final_time(2, PortType::Pickup, 20).unwrap(), 10);
        assert_eq!(port.final_time(2, PortType::Pickup, 8).unwrap(), 7);
    }

    #[test]
    fn rows_skip_the_hub() {
        let ports = Ports::new(vec![
            Port::new(HUB, String::from("HUB00"), true),
            Port::new(PortIdx(1), String::from("PortA"), false).with_pickup(1, 0, 0, 0.0, 5.0),
            Port::new(PortIdx(2), String::from("PortB"), false).with_delivery(1, 0, 0, 0.0, 7.0),
        ])
        .unwrap();
        assert_eq!(ports.num_rows(), 4);
        assert_eq!(ports.row_of(HUB, PortType::Pickup), None);
        assert_eq!(ports.row_of(PortIdx(2), PortType::Pickup), Some(1));
        assert_eq!(ports.row_of(PortIdx(1), PortType::Delivery), Some(2));
        assert_eq!(ports.row_port(3), (PortIdx(2), PortType::Delivery));
        assert_eq!(ports.rows().count(), 4);
        assert_eq!(ports.all_penalties(), 12.0);
    }

    #[test]
    fn hub_must_be_unique() {
        let result = Ports::new(vec![
            Port::new(HUB, String::from("HUB00"), true),
            Port::new(PortIdx(1), String::from("HUB01"), true),
        ]);
        assert!(matches!(result, Err(ModelError::InvalidHub(name)) if name == "HUB01"));
    }
}
