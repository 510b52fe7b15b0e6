use model::config::Config;
use solution::test_utilities::init_test_data;
use solution::Column;
use std::sync::Arc;

use super::BranchAndPrice;
use crate::master::{IntegerSolution, LinearSolution, MasterError, RowLayout};
use crate::result::{BoundType, TerminationReason, TreeResult};
use crate::test_utilities::{uniform_lp_solution, ScriptedMaster};

fn sequential() -> Config {
    Config {
        parallel_labelling: false,
        ..Config::default()
    }
}

/// zero duals and every column at one: pricing finds improving columns.
fn generating(layout: &RowLayout, columns: &[Arc<Column>]) -> Result<LinearSolution, MasterError> {
    Ok(uniform_lp_solution(layout, columns, 0.0, 1e8, |_, _| 1.0))
}

fn first_acyclic(columns: &[Arc<Column>]) -> usize {
    columns
        .iter()
        .position(|c| !c.is_dummy() && !c.has_cycles())
        .unwrap()
}

/// duals too low for any improving column; the first acyclic column at one.
fn integral(layout: &RowLayout, columns: &[Arc<Column>]) -> Result<LinearSolution, MasterError> {
    let chosen = first_acyclic(columns);
    Ok(uniform_lp_solution(layout, columns, -1000.0, 70.0, |i, _| {
        if i == chosen {
            1.0
        } else {
            0.0
        }
    }))
}

/// duals too low for any improving column; two acyclic columns at one half.
fn fractional(layout: &RowLayout, columns: &[Arc<Column>]) -> Result<LinearSolution, MasterError> {
    let halves: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_dummy() && !c.has_cycles())
        .map(|(i, _)| i)
        .take(2)
        .collect();
    Ok(uniform_lp_solution(layout, columns, -1000.0, 60.0, move |i, _| {
        if halves.contains(&i) {
            0.5
        } else {
            0.0
        }
    }))
}

fn infeasible_lp(_: &RowLayout, _: &[Arc<Column>]) -> Result<LinearSolution, MasterError> {
    Err(MasterError::Infeasible)
}

fn infeasible_mip(_: &RowLayout, _: &[Arc<Column>]) -> Result<IntegerSolution, MasterError> {
    Err(MasterError::Infeasible)
}

#[test]
fn infeasible_root_is_an_outcome() {
    let d = init_test_data();
    let config = sequential();
    let master = ScriptedMaster::new().then_lp(infeasible_lp);

    let outcome = BranchAndPrice::new(&d.network, &config, &master)
        .solve()
        .unwrap();

    assert!(matches!(outcome.result(), TreeResult::Infeasible));
    assert_eq!(
        *outcome.termination_reason(),
        TerminationReason::InfeasibilityProven
    );
    assert_eq!(outcome.statistics().prunings_infeasible, 1);
    assert_eq!(outcome.statistics().nodes_explored, 1);
}

#[test]
fn dummy_in_the_basis_prunes_the_node() {
    let d = init_test_data();
    let config = sequential();
    let master = ScriptedMaster::new().then_lp(|layout, columns| {
        Ok(uniform_lp_solution(layout, columns, -1000.0, 1e8, |_, _| 1.0))
    });

    let outcome = BranchAndPrice::new(&d.network, &config, &master)
        .solve()
        .unwrap();

    assert!(matches!(outcome.result(), TreeResult::Infeasible));
    assert_eq!(outcome.statistics().prunings_infeasible, 1);
    assert_eq!(outcome.statistics().mip_solves, 0);
}

#[test]
fn integer_master_closes_the_root() {
    let d = init_test_data();
    let config = sequential();
    let master = ScriptedMaster::new()
        .then_lp(generating)
        .then_lp(integral)
        .then_mip(|_, columns| {
            let chosen = first_acyclic(columns);
            Ok(IntegerSolution {
                objective: 70.0,
                values: (0..columns.len())
                    .map(|i| if i == chosen { 1.0 } else { 0.0 })
                    .collect(),
            })
        });

    let outcome = BranchAndPrice::new(&d.network, &config, &master)
        .solve()
        .unwrap();

    let TreeResult::Optimal(incumbent) = outcome.result() else {
        panic!("expected an optimal result");
    };
    assert_eq!(incumbent.objective(), 70.0);
    assert_eq!(incumbent.bound_type(), BoundType::FromMip);
    assert_eq!(incumbent.columns().len(), 1);
    assert_eq!(
        incumbent.columns()[0].0.origin(),
        solution::ColumnOrigin::Mip
    );
    assert_eq!(outcome.lower_bound(), 70.0);
    assert_eq!(outcome.gap(), 0.0);
    let stats = outcome.statistics();
    assert_eq!(stats.gap_at_root, Some(0.0));
    assert_eq!(stats.prunings_bound, 1);
    assert_eq!(stats.mip_solves, 1);
    assert!(stats.columns_generated > 0);
}

#[test]
fn integral_lp_becomes_the_incumbent() {
    let d = init_test_data();
    let config = sequential();
    let master = ScriptedMaster::new()
        .then_lp(generating)
        .then_lp(integral)
        .then_mip(infeasible_mip);

    let outcome = BranchAndPrice::new(&d.network, &config, &master)
        .solve()
        .unwrap();

    let incumbent = outcome.incumbent().unwrap();
    assert_eq!(incumbent.objective(), 70.0);
    assert_eq!(incumbent.bound_type(), BoundType::FromLp);
    assert_eq!(incumbent.node(), 0);
    assert_eq!(outcome.statistics().branchings, 0);
    assert_eq!(
        *outcome.termination_reason(),
        TerminationReason::OptimalityProven
    );
}

#[test]
fn fractional_roots_are_branched() {
    let d = init_test_data();
    let config = sequential();
    let mut master = ScriptedMaster::new()
        .then_lp(generating)
        .then_lp(fractional)
        .then_mip(infeasible_mip);
    // every child is infeasible
    for _ in 0..10 {
        master = master.then_lp(infeasible_lp);
    }

    let outcome = BranchAndPrice::new(&d.network, &config, &master)
        .solve()
        .unwrap();

    let stats = outcome.statistics();
    assert_eq!(stats.branchings, 1);
    assert!(stats.nodes_generated >= 3);
    assert_eq!(stats.nodes_explored, stats.nodes_generated);
    assert_eq!(stats.prunings_infeasible, stats.nodes_generated - 1);
    assert_eq!(stats.max_depth, 1);
    assert!(matches!(outcome.result(), TreeResult::Infeasible));
}

#[test]
fn time_limit_keeps_the_open_nodes() {
    let d = init_test_data();
    let config = Config {
        time_limit_in_s: -1.0,
        ..sequential()
    };
    let master = ScriptedMaster::new()
        .then_lp(generating)
        .then_lp(fractional)
        .then_mip(infeasible_mip);

    let outcome = BranchAndPrice::new(&d.network, &config, &master)
        .solve()
        .unwrap();

    assert_eq!(*outcome.termination_reason(), TerminationReason::TimeLimit);
    assert!(matches!(outcome.result(), TreeResult::Infeasible));
    assert_eq!(outcome.statistics().nodes_explored, 1);
    assert_eq!(outcome.lower_bound(), 60.0);
}

#[test]
fn solver_errors_end_the_run() {
    let d = init_test_data();
    let config = sequential();
    let master = ScriptedMaster::new()
        .then_lp(generating)
        .then_lp(integral)
        .then_mip(|_, _| Err(MasterError::Solver("license expired".to_string())));

    let result = BranchAndPrice::new(&d.network, &config, &master).solve();
    assert!(result.is_err());
}

#[cfg(feature = "highs")]
mod with_highs {
    use super::*;
    use crate::master::highs::HighsMaster;
    use model::config::PortRowSense;

    #[test]
    fn optional_calls_are_solved_to_optimality() {
        let d = init_test_data();
        let config = Config {
            port_row_sense: PortRowSense::AtMostOne,
            ..Config::default()
        };
        let master = HighsMaster::new();

        let outcome = BranchAndPrice::new(&d.network, &config, &master)
            .solve()
            .unwrap();

        assert_eq!(
            *outcome.termination_reason(),
            TerminationReason::OptimalityProven
        );
        let incumbent = outcome.incumbent().unwrap();
        // serving nothing costs all penalties
        assert!(incumbent.objective() <= 115.0 + 1e-6);
        let vessel_classes = d.network.vessel_classes();
        for vc in vessel_classes.iter() {
            let used: f64 = incumbent
                .columns()
                .iter()
                .filter(|(c, _)| c.vessel_class() == Some(vc))
                .map(|(_, v)| v)
                .sum();
            assert!(used <= vessel_classes.vessel_class(vc).num_vessels() as f64 + 1e-6);
        }
        assert!(outcome.lower_bound() <= incumbent.objective() + 1e-6);
    }

    #[test]
    fn mandatory_calls_end_in_an_outcome() {
        let d = init_test_data();
        let config = Config::default();
        let master = HighsMaster::new();

        let outcome = BranchAndPrice::new(&d.network, &config, &master)
            .solve()
            .unwrap();

        if let Some(incumbent) = outcome.incumbent() {
            assert!(incumbent.columns().iter().all(|(c, _)| !c.is_dummy()));
            assert!(outcome.lower_bound() <= incumbent.objective() + 1e-6);
        }
    }
}
