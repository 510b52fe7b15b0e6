use model::base_types::Cost;
use model::network::legs::LegCosts;

/// Decomposition of the cost of a rotation into its components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolutionCosts {
    pub total: Cost,
    pub bunker: Cost,
    pub time_charter: Cost,
    pub port: Cost,
    pub movement: Cost,
    pub revenue: Cost,
}

impl SolutionCosts {
    pub fn add_leg(&mut self, leg_costs: &LegCosts) {
        self.total += leg_costs.total();
        self.bunker += leg_costs.bunker;
        self.time_charter += leg_costs.time_charter;
        self.port += leg_costs.port_fee;
        self.movement += leg_costs.movement;
        self.revenue += leg_costs.revenue;
    }

    pub fn add(&mut self, other: &SolutionCosts) {
        self.total += other.total;
        self.bunker += other.bunker;
        self.time_charter += other.time_charter;
        self.port += other.port;
        self.movement += other.movement;
        self.revenue += other.revenue;
    }

    /// share of the bunker costs in the total cost, 0 for a rotation without costs.
    pub fn bunker_share(&self) -> f64 {
        if self.total.abs() < 1e-9 {
            0.0
        } else {
            self.bunker / self.total
        }
    }
}
