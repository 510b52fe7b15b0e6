use serde::{Deserialize, Serialize};

use crate::base_types::{ArcType, Cost, Distance, Speed};

/// Cost decomposition of an arc.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegCosts {
    #[serde(default)]
    pub bunker: Cost,
    #[serde(default)]
    pub time_charter: Cost,
    #[serde(default)]
    pub movement: Cost,
    #[serde(default)]
    pub port_fee: Cost,
    #[serde(default)]
    pub revenue: Cost,
}

impl LegCosts {
    pub fn total(&self) -> Cost {
        self.bunker + self.time_charter + self.movement + self.port_fee - self.revenue
    }

    pub fn add(&mut self, other: &LegCosts) {
        self.bunker += other.bunker;
        self.time_charter += other.time_charter;
        self.movement += other.movement;
        self.port_fee += other.port_fee;
        self.revenue += other.revenue;
    }
}

/// Payload of an arc of a vessel class's graph: one leg of a voyage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    costs: LegCosts,
    cost: Cost,
    length: Distance,
    speed: Speed,
    arc_type: ArcType,
}

impl Leg {
    pub fn new(arc_type: ArcType, costs: LegCosts, length: Distance, speed: Speed) -> Leg {
        Leg {
            cost: costs.total(),
            costs,
            length,
            speed,
            arc_type,
        }
    }

    /// total cost: bunker + time charter + movement + port fee - revenue.
    pub fn cost(&self) -> Cost {
        self.cost
    }

    pub fn costs(&self) -> &LegCosts {
        &self.costs
    }

    pub fn length(&self) -> Distance {
        self.length
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn arc_type(&self) -> ArcType {
        self.arc_type
    }
}
