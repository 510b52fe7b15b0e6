use model::config::Config;
use model::json_serialisation::load_instance_from_json;
use model::err::ModelError;
use solution::json_serialisation::rotations_to_json;
use solver::monitor::LogMonitor;
use solver::report::RunSummary;
use solver::{BranchAndPrice, MasterSolver, SolverError};

use derive_more::{Display, From};
use std::time as stdtime;
use tracing::info;

#[derive(Debug, Display, From)]
pub enum RunError {
    #[display(fmt = "cannot load instance: {}", _0)]
    Model(ModelError),
    #[display(fmt = "branch-and-price failed: {}", _0)]
    Solver(SolverError),
}

impl std::error::Error for RunError {}

/// Loads the instance, runs branch-and-price with `master` and returns the
/// summary together with the chosen rotations.
pub fn run(
    input_data: serde_json::Value,
    config: &Config,
    master: &impl MasterSolver,
) -> Result<serde_json::Value, RunError> {
    let network = load_instance_from_json(input_data)?;
    info!(
        "instance with {} ports, {} vessel classes and {} time steps",
        network.ports().len(),
        network.vessel_classes().len(),
        network.num_times()
    );
    let start_time = stdtime::Instant::now();

    let outcome = BranchAndPrice::new(&network, config, master)
        .solve_with_monitor(&mut LogMonitor::new())?;

    let runtime_duration = stdtime::Instant::now().duration_since(start_time);
    let summary = RunSummary::new(&outcome, &network);
    println!();
    print!("{}", summary);
    println!("Running time: {:0.2}sec", runtime_duration.as_secs_f32());

    let rotations: Vec<_> = outcome
        .incumbent()
        .map(|i| i.columns().iter().map(|(c, v)| (c.as_ref(), *v)).collect())
        .unwrap_or_default();
    Ok(serde_json::json!({
        "summary": summary.to_json(),
        "runningTime": runtime_duration.as_secs_f64(),
        "rotations": rotations_to_json(&rotations, &network),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solver::test_utilities::{uniform_lp_solution, ScriptedMaster};
    use solver::MasterError;

    const TEST_INSTANCE: &str = include_str!("../../model/resources/test_instance.json");

    fn sequential() -> Config {
        Config {
            parallel_labelling: false,
            ..Config::default()
        }
    }

    #[test]
    fn infeasible_runs_still_report() {
        let input: serde_json::Value = serde_json::from_str(TEST_INSTANCE).unwrap();
        let master = ScriptedMaster::new().then_lp(|layout, columns| {
            Ok(uniform_lp_solution(layout, columns, -1000.0, 1e8, |_, _| 1.0))
        });
        let output = run(input, &sequential(), &master).unwrap();
        assert_eq!(output["summary"]["termination"], "infeasibility proven");
        assert_eq!(output["rotations"].as_array().map(|r| r.len()), Some(0));
    }

    #[test]
    fn broken_instances_are_errors() {
        let master = ScriptedMaster::new();
        let result = run(serde_json::json!({ "numTimes": 3 }), &sequential(), &master);
        assert!(matches!(result, Err(RunError::Model(_))));

        let input: serde_json::Value = serde_json::from_str(TEST_INSTANCE).unwrap();
        let master = ScriptedMaster::new().then_lp(|_, _| Err(MasterError::Solver("down".into())));
        let result = run(input, &sequential(), &master);
        assert!(matches!(result, Err(RunError::Solver(_))));
    }
}
