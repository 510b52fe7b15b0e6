use model::network::Network;
use serde_json::json;
use solution::solution_costs::SolutionCosts;
use std::fmt;

use crate::result::{BoundType, TreeOutcome};

#[derive(Debug, Clone, PartialEq)]
pub struct VesselUsage {
    pub name: String,
    pub used: f64,
    pub available: u32,
}

/// End-of-run figures of the incumbent rotations.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub termination: String,
    pub objective: Option<f64>,
    pub lower_bound: f64,
    pub gap: f64,
    pub bound_type: Option<BoundType>,
    /// summed over all rotations
    pub costs: SolutionCosts,
    pub all_penalties: f64,
    pub unserved_penalties: f64,
    pub vessels: Vec<VesselUsage>,
    pub rotations: f64,
    pub average_length: f64,
    pub average_ports: f64,
    pub average_load_efficiency: f64,
    pub served_calls: usize,
    pub average_cargo_travel_distance: f64,
    pub bunker_share: f64,
}

impl RunSummary {
    pub fn new(outcome: &TreeOutcome, network: &Network) -> RunSummary {
        let ports = network.ports();
        let vessel_classes = network.vessel_classes();
        let columns = outcome
            .incumbent()
            .map(|i| i.columns())
            .unwrap_or_default();

        let mut costs = SolutionCosts::default();
        let mut covered = vec![0.0; ports.num_rows()];
        let mut used = vec![0.0; vessel_classes.len()];
        let mut rotations = 0.0;
        let mut length = 0.0;
        let mut calls = 0.0;
        let mut load_efficiency = 0.0;
        let mut cargo_distance = 0.0;
        let mut cargo_count = 0.0;

        for (column, value) in columns.iter() {
            let Some(solution) = column.solution() else {
                continue;
            };
            let capacity = vessel_classes
                .vessel_class(solution.vessel_class())
                .capacity();
            let mut solution_costs = solution.solution_costs();
            scale(&mut solution_costs, *value);
            costs.add(&solution_costs);
            for (row, coefficient) in column.port_coefficients().iter().enumerate() {
                covered[row] += coefficient * value;
            }
            used[solution.vessel_class().idx()] += value;
            rotations += value;
            length += solution.length() * value;
            calls += solution.n_ports_visited() as f64 * value;
            load_efficiency += solution.highest_load_efficiency(capacity) * value;
            let distances = solution.cargo_travel_distances();
            cargo_count += distances.len() as f64 * value;
            cargo_distance += distances.iter().sum::<f64>() * value;
        }

        let unserved_penalties = ports
            .rows()
            .zip(covered.iter())
            .filter(|(_, c)| **c < 0.5)
            .map(|((port, port_type), _)| ports.port(port).penalty(port_type))
            .sum();
        let average = |total: f64, count: f64| if count > 0.0 { total / count } else { 0.0 };

        RunSummary {
            termination: outcome.termination_reason().to_string(),
            objective: outcome.incumbent().map(|i| i.objective()),
            lower_bound: outcome.lower_bound(),
            gap: outcome.gap(),
            bound_type: outcome.incumbent().map(|i| i.bound_type()),
            bunker_share: costs.bunker_share(),
            costs,
            all_penalties: ports.all_penalties(),
            unserved_penalties,
            vessels: vessel_classes
                .iter()
                .map(|vc| {
                    let vessel_class = vessel_classes.vessel_class(vc);
                    VesselUsage {
                        name: vessel_class.name().clone(),
                        used: used[vc.idx()],
                        available: vessel_class.num_vessels(),
                    }
                })
                .collect(),
            rotations,
            average_length: average(length, rotations),
            average_ports: average(calls, rotations),
            average_load_efficiency: average(load_efficiency, rotations),
            served_calls: covered.iter().filter(|c| **c >= 0.5).count(),
            average_cargo_travel_distance: average(cargo_distance, cargo_count),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "termination": self.termination,
            "objective": self.objective,
            "lowerBound": finite_or_null(self.lower_bound),
            "gap": finite_or_null(self.gap),
            "boundType": self.bound_type.map(|b| b.to_string()),
            "costs": {
                "total": self.costs.total,
                "bunker": self.costs.bunker,
                "timeCharter": self.costs.time_charter,
                "port": self.costs.port,
                "movement": self.costs.movement,
                "revenue": self.costs.revenue,
            },
            "allPenalties": self.all_penalties,
            "unservedPenalties": self.unserved_penalties,
            "vessels": self.vessels.iter().map(|v| json!({
                "vesselClass": v.name,
                "used": v.used,
                "available": v.available,
            })).collect::<Vec<_>>(),
            "rotations": self.rotations,
            "averageLength": self.average_length,
            "averagePorts": self.average_ports,
            "averageLoadEfficiency": self.average_load_efficiency,
            "servedCalls": self.served_calls,
            "averageCargoTravelDistance": self.average_cargo_travel_distance,
            "bunkerShare": self.bunker_share,
        })
    }
}

fn scale(costs: &mut SolutionCosts, factor: f64) {
    costs.total *= factor;
    costs.bunker *= factor;
    costs.time_charter *= factor;
    costs.port *= factor;
    costs.movement *= factor;
    costs.revenue *= factor;
}

fn finite_or_null(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "*** SOLUTION ({}) ***", self.termination)?;
        match (self.objective, self.bound_type) {
            (Some(objective), Some(bound_type)) => {
                writeln!(f, "  Objective:             {:.2} (from {})", objective, bound_type)?
            }
            _ => writeln!(f, "  Objective:             none")?,
        }
        writeln!(f, "  Gap:                   {:.2}%", self.gap)?;
        writeln!(f, "  Rotation costs:        {:.2}", self.costs.total)?;
        writeln!(f, "    bunker:              {:.2}", self.costs.bunker)?;
        writeln!(f, "    time charter:        {:.2}", self.costs.time_charter)?;
        writeln!(f, "    port fees:           {:.2}", self.costs.port)?;
        writeln!(f, "    movement:            {:.2}", self.costs.movement)?;
        writeln!(f, "    revenue:             {:.2}", self.costs.revenue)?;
        writeln!(
            f,
            "  Unserved penalties:    {:.2} of {:.2}",
            self.unserved_penalties, self.all_penalties
        )?;
        for vessel in self.vessels.iter() {
            writeln!(
                f,
                "  Vessels {:<14} {} of {}",
                format!("{}:", vessel.name),
                vessel.used,
                vessel.available
            )?;
        }
        writeln!(f, "  Average length:        {:.2}", self.average_length)?;
        writeln!(f, "  Average ports:         {:.2}", self.average_ports)?;
        writeln!(f, "  Average load eff.:     {:.2}", self.average_load_efficiency)?;
        writeln!(f, "  Served calls:          {}", self.served_calls)?;
        writeln!(
            f,
            "  Average cargo travel:  {:.2}",
            self.average_cargo_travel_distance
        )?;
        writeln!(f, "  Bunker share:          {:.2}%", self.bunker_share * 100.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Incumbent;
    use crate::stats::TreeStatistics;
    use solution::test_utilities::{init_test_data, solution_through};
    use solution::{Column, ColumnOrigin};
    use std::sync::Arc;

    #[test]
    fn summary_of_a_single_rotation() {
        let d = init_test_data();
        let solution =
            solution_through(&d.network, d.small, &[d.source, d.a_de, d.b_pu4, d.sink], -38.0);
        let column = Arc::new(Column::new(solution, 2, ColumnOrigin::Mip));
        let objective = 115.0 + column.objective_coefficient();
        let incumbent = Incumbent::new(objective, vec![(column, 1.0)], BoundType::FromMip, 0);
        let outcome = TreeOutcome::optimal(incumbent, TreeStatistics::default());

        let summary = RunSummary::new(&outcome, &d.network);
        assert_eq!(summary.costs.total, 27.0);
        assert_eq!(summary.served_calls, 2);
        // A pickup (30) and B delivery (20) stay unserved
        assert_eq!(summary.unserved_penalties, 50.0);
        assert_eq!(summary.all_penalties, 115.0);
        assert_eq!(summary.vessels[0].used, 1.0);
        assert_eq!(summary.vessels[1].used, 0.0);
        assert_eq!(summary.average_ports, 2.0);
        assert_eq!(summary.average_length, 60.0);
        assert_eq!(summary.average_cargo_travel_distance, 25.0);
        assert_eq!(summary.average_load_efficiency, 0.5);

        let json = summary.to_json();
        assert_eq!(json["servedCalls"], 2);
        assert_eq!(json["boundType"], "mip");
        assert_eq!(json["gap"], 0.0);
    }

    #[test]
    fn infeasible_runs_have_an_empty_summary() {
        let d = init_test_data();
        let outcome = TreeOutcome::infeasible(TreeStatistics::default());
        let summary = RunSummary::new(&outcome, &d.network);
        assert_eq!(summary.objective, None);
        assert_eq!(summary.rotations, 0.0);
        assert_eq!(summary.unserved_penalties, 115.0);
        assert!(summary.to_json()["lowerBound"].is_null());
        assert!(summary.to_string().contains("none"));
    }
}
