use good_lp::solvers::highs::highs;
use good_lp::solvers::{DualValues, SolutionWithDual};
use good_lp::*;
use solution::Column;
use std::sync::Arc;

use super::{
    IntegerSolution, LinearSolution, MasterError, MasterSolver, RowBound, RowLayout,
};

/// The restricted master problem solved with HiGHS through `good_lp`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HighsMaster;

impl HighsMaster {
    pub fn new() -> HighsMaster {
        HighsMaster
    }
}

struct Formulation {
    vars: ProblemVariables,
    x: Vec<Variable>,
    objective: Expression,
    port_rows: Vec<Constraint>,
    vessel_class_rows: Vec<Constraint>,
}

fn formulate(layout: &RowLayout, columns: &[Arc<Column>], integer: bool) -> Formulation {
    let mut vars = variables!();
    let x: Vec<Variable> = columns
        .iter()
        .map(|_| {
            if integer {
                vars.add(variable().integer().min(0.0))
            } else {
                vars.add(variable().min(0.0))
            }
        })
        .collect();

    let objective = columns
        .iter()
        .zip(x.iter())
        .fold(Expression::from(layout.objective_constant()), |acc, (c, v)| {
            acc + c.objective_coefficient() * *v
        });

    let port_rows = layout
        .port_rows()
        .iter()
        .enumerate()
        .map(|(row, (_, bound))| {
            let lhs = columns
                .iter()
                .zip(x.iter())
                .filter(|(c, _)| c.port_coefficient(row) != 0.0)
                .fold(Expression::from(0.0), |acc, (c, v)| {
                    acc + c.port_coefficient(row) * *v
                });
            match *bound {
                RowBound::AtLeast(b) => lhs.geq(b),
                RowBound::AtMost(b) => lhs.leq(b),
                RowBound::Exactly(b) => lhs.eq(b),
            }
        })
        .collect();

    let vessel_class_rows = layout
        .vessel_class_rows()
        .iter()
        .enumerate()
        .map(|(vc, num_vessels)| {
            let lhs = columns
                .iter()
                .zip(x.iter())
                .filter(|(c, _)| c.vessel_class_coefficients()[vc] != 0.0)
                .fold(Expression::from(0.0), |acc, (_, v)| acc + *v);
            lhs.leq(*num_vessels)
        })
        .collect();

    Formulation {
        vars,
        x,
        objective,
        port_rows,
        vessel_class_rows,
    }
}

fn to_master_error(error: ResolutionError) -> MasterError {
    match error {
        ResolutionError::Infeasible => MasterError::Infeasible,
        other => MasterError::Solver(other.to_string()),
    }
}

impl MasterSolver for HighsMaster {
    fn solve_lp(
        &self,
        layout: &RowLayout,
        columns: &[Arc<Column>],
    ) -> Result<LinearSolution, MasterError> {
        let formulation = formulate(layout, columns, false);
        let mut problem = formulation
            .vars
            .minimise(formulation.objective.clone())
            .using(highs);
        let port_refs: Vec<ConstraintReference> = formulation
            .port_rows
            .into_iter()
            .map(|c| problem.add_constraint(c))
            .collect();
        let vessel_refs: Vec<ConstraintReference> = formulation
            .vessel_class_rows
            .into_iter()
            .map(|c| problem.add_constraint(c))
            .collect();

        let mut solution = problem.solve().map_err(to_master_error)?;
        let objective = solution.eval(&formulation.objective);
        let values = formulation.x.iter().map(|v| solution.value(*v)).collect();

        let duals = solution.compute_dual();
        let row_duals: Vec<f64> = port_refs.iter().map(|r| duals.dual(r.clone())).collect();
        let vessel_class_duals = vessel_refs.iter().map(|r| duals.dual(r.clone())).collect();

        Ok(LinearSolution {
            objective,
            port_duals: Arc::new(layout.port_duals(&row_duals)),
            vessel_class_duals,
            values,
        })
    }

    fn solve_mip(
        &self,
        layout: &RowLayout,
        columns: &[Arc<Column>],
    ) -> Result<IntegerSolution, MasterError> {
        let formulation = formulate(layout, columns, true);
        let mut problem = formulation
            .vars
            .minimise(formulation.objective.clone())
            .using(highs);
        for c in formulation
            .port_rows
            .into_iter()
            .chain(formulation.vessel_class_rows)
        {
            problem.add_constraint(c);
        }
        let solution = problem.solve().map_err(to_master_error)?;
        Ok(IntegerSolution {
            objective: solution.eval(&formulation.objective),
            values: formulation.x.iter().map(|v| solution.value(*v)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::config::PortRowSense;
    use solution::test_utilities::{init_test_data, solution_through};
    use solution::ColumnOrigin;

    #[test]
    fn dummy_column_keeps_the_root_feasible() {
        let d = init_test_data();
        let ports = d.network.ports();
        let layout = RowLayout::new(&ports, &d.network.vessel_classes(), PortRowSense::AtLeastOne);
        let columns = vec![Arc::new(Column::dummy(&ports, 2, 1e8))];
        let lp = HighsMaster::new().solve_lp(&layout, &columns).unwrap();
        assert!((lp.values[0] - 1.0).abs() < 1e-6);
        assert!((lp.objective - (1e8 + 115.0)).abs() < 1e-3);
        // every row is worth the price of the dummy column
        let dual_sum: f64 = lp.port_duals.values().map(|d| d.pickup + d.delivery).sum();
        assert!((dual_sum - 1e8).abs() < 1e-3);
    }

    #[test]
    fn mip_without_dummy_may_be_infeasible() {
        let d = init_test_data();
        let ports = d.network.ports();
        let layout = RowLayout::new(&ports, &d.network.vessel_classes(), PortRowSense::AtLeastOne);
        let column = Arc::new(Column::new(
            solution_through(&d.network, d.small, &[d.source, d.a_de, d.b_pu4, d.sink], -38.0),
            2,
            ColumnOrigin::Mip,
        ));
        let result = HighsMaster::new().solve_mip(&layout, &[column.clone()]);
        assert!(matches!(result, Err(MasterError::Infeasible)));

        let relaxed = RowLayout::new(&ports, &d.network.vessel_classes(), PortRowSense::AtMostOne);
        let mip = HighsMaster::new().solve_mip(&relaxed, &[column]).unwrap();
        assert!((mip.values[0] - 1.0).abs() < 1e-6);
        assert!((mip.objective - (115.0 - 38.0)).abs() < 1e-6);
    }
}
