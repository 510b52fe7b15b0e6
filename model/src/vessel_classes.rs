use std::fmt;

use crate::base_types::{Cost, Quantity, Speed, VesselClassIdx, VesselCount};

pub struct VesselClasses {
    vessel_classes: Vec<VesselClass>,
}

impl VesselClasses {
    pub fn new(vessel_classes: Vec<VesselClass>) -> VesselClasses {
        VesselClasses { vessel_classes }
    }

    pub fn get(&self, idx: VesselClassIdx) -> Option<&VesselClass> {
        self.vessel_classes.get(idx.idx())
    }

    /// panics if the vessel class does not exist.
    pub fn vessel_class(&self, idx: VesselClassIdx) -> &VesselClass {
        &self.vessel_classes[idx.idx()]
    }

    pub fn iter(&self) -> impl Iterator<Item = VesselClassIdx> + '_ {
        self.vessel_classes.iter().map(|vc| vc.idx)
    }

    pub fn len(&self) -> usize {
        self.vessel_classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vessel_classes.is_empty()
    }

    pub fn idx_of(&self, name: &str) -> Option<VesselClassIdx> {
        self.vessel_classes
            .iter()
            .find(|vc| vc.name == name)
            .map(|vc| vc.idx)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VesselClass {
    idx: VesselClassIdx,
    name: String,
    capacity: Quantity,
    num_vessels: VesselCount,
    time_charter_cost_per_time_unit: Cost,
    hotel_cost_per_time_unit: Cost,
    bunker_cost_per_time_unit: Vec<(Speed, Cost)>, // sorted by speed
}

impl VesselClass {
    pub fn new(
        idx: VesselClassIdx,
        name: String,
        capacity: Quantity,
        num_vessels: VesselCount,
        time_charter_cost_per_time_unit: Cost,
        hotel_cost_per_time_unit: Cost,
        mut bunker_cost_per_time_unit: Vec<(Speed, Cost)>,
    ) -> VesselClass {
        bunker_cost_per_time_unit.sort_by(|a, b| a.0.total_cmp(&b.0));
        VesselClass {
            idx,
            name,
            capacity,
            num_vessels,
            time_charter_cost_per_time_unit,
            hotel_cost_per_time_unit,
            bunker_cost_per_time_unit,
        }
    }

    pub fn idx(&self) -> VesselClassIdx {
        self.idx
    }

    pub fn name(&self) -> &String {
        &self.name
    }

    pub fn capacity(&self) -> Quantity {
        self.capacity
    }

    pub fn num_vessels(&self) -> VesselCount {
        self.num_vessels
    }

    pub fn time_charter_cost_per_time_unit(&self) -> Cost {
        self.time_charter_cost_per_time_unit
    }

    pub fn hotel_cost_per_time_unit(&self) -> Cost {
        self.hotel_cost_per_time_unit
    }

    pub fn speeds(&self) -> impl Iterator<Item = Speed> + '_ {
        self.bunker_cost_per_time_unit.iter().map(|(s, _)| *s)
    }

    pub fn bunker_cost_per_time_unit(&self, speed: Speed) -> Option<Cost> {
        self.bunker_cost_per_time_unit
            .iter()
            .find(|(s, _)| (s - speed).abs() < 1e-6)
            .map(|(_, c)| *c)
    }

    pub fn top_speed(&self) -> Speed {
        self.bunker_cost_per_time_unit
            .last()
            .map(|(s, _)| *s)
            .unwrap_or(0.0)
    }
}

impl fmt::Display for VesselClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (capacity: {}, vessels: {})",
            self.name, self.capacity, self.num_vessels
        )
    }
}
