use serde::{Deserialize, Serialize};

use crate::base_types::Cost;

/// How the (port, role) rows of the master problem are bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PortRowSense {
    /// every port-role has to be covered (`>= 1`); the dummy column keeps the
    /// master feasible.
    AtLeastOne,
    /// every port-role is covered at most once (`<= 1`); uncovered ones pay their
    /// penalty through the objective constant.
    AtMostOne,
}

/// Parameters of a branch-and-price run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub greedy_max_outarcs: usize, // delta: the heuristic walk picks among this many cheapest arcs
    pub greedy_reruns: usize,      // theta: walks per direction
    pub max_cols_to_solve_mp: usize,
    pub dummy_column_price: Cost,
    pub elementary_labelling_every_n_nodes: usize,
    pub try_elementary_labelling: bool,
    pub try_smart_graph_reduction: bool,
    pub try_reduced_labelling: bool,
    pub smart_min_chance: f64,
    pub smart_max_chance: f64,
    pub reduction: ConfigReduction,
    pub time_limit_in_s: f64,
    pub parallel_labelling: bool,
    pub early_branching: bool,
    pub early_branching_timeout: f64, // seconds
    pub port_row_sense: PortRowSense,
    pub random_seed: u64,
    pub lp_tolerance: f64,
}

/// Percentages of the cheapest arcs kept by the reduced graphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigReduction {
    pub start: f64,
    pub end_elementary: f64,
    pub end: f64,
    pub increment: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            greedy_max_outarcs: 5,
            greedy_reruns: 10,
            max_cols_to_solve_mp: 500,
            dummy_column_price: 1e8,
            elementary_labelling_every_n_nodes: 1,
            try_elementary_labelling: true,
            try_smart_graph_reduction: true,
            try_reduced_labelling: true,
            smart_min_chance: 0.1,
            smart_max_chance: 0.9,
            reduction: ConfigReduction::default(),
            time_limit_in_s: 3600.0,
            parallel_labelling: true,
            early_branching: false,
            early_branching_timeout: 60.0,
            port_row_sense: PortRowSense::AtLeastOne,
            random_seed: 0,
            lp_tolerance: 1e-6,
        }
    }
}

impl Default for ConfigReduction {
    fn default() -> Self {
        ConfigReduction {
            start: 0.1,
            end_elementary: 0.6,
            end: 1.0,
            increment: 0.1,
        }
    }
}

impl ConfigReduction {
    /// percentages `start, start + increment, ...` up to and including `end`
    /// (with a small tolerance for accumulated rounding).
    pub fn steps_up_to(&self, end: f64) -> Vec<f64> {
        let mut steps = Vec::new();
        if self.increment <= 0.0 {
            return steps;
        }
        let mut i = 0;
        loop {
            let pct = self.start + i as f64 * self.increment;
            if pct > end + 1e-9 {
                break;
            }
            steps.push(pct);
            i += 1;
        }
        steps
    }
}
