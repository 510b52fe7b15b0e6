#[cfg(feature = "highs")]
pub mod highs;

use derive_more::Display;
use model::base_types::{Cost, PortIdx, PortType, PortWithType};
use model::config::PortRowSense;
use model::ports::Ports;
use model::vessel_classes::VesselClasses;
use solution::Column;
use std::collections::HashMap;
use std::sync::Arc;

use crate::network_view::{PortDual, PortDuals};

#[derive(Debug, Display)]
pub enum MasterError {
    #[display(fmt = "master problem is infeasible")]
    Infeasible,
    #[display(fmt = "master solver failed: {}", _0)]
    Solver(String),
}

impl std::error::Error for MasterError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowBound {
    AtLeast(f64),
    AtMost(f64),
    Exactly(f64),
}

impl RowBound {
    pub fn is_satisfied_by(&self, lhs: f64, tolerance: f64) -> bool {
        match *self {
            RowBound::AtLeast(b) => lhs >= b - tolerance,
            RowBound::AtMost(b) => lhs <= b + tolerance,
            RowBound::Exactly(b) => (lhs - b).abs() <= tolerance,
        }
    }
}

/// The constraints of the master problem of one tree node.
///
/// One row per (port, role) except the hub, in the order of
/// `Ports::row_of`, and one row per vessel class bounding the number of
/// rotations by the number of vessels. The objective is the sum of all
/// penalties plus the objective coefficients of the chosen columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    port_rows: Vec<(PortWithType, RowBound)>,
    vessel_class_rows: Vec<f64>,
    objective_constant: Cost,
}

// static functions
impl RowLayout {
    pub fn new(ports: &Ports, vessel_classes: &VesselClasses, sense: PortRowSense) -> RowLayout {
        let bound = match sense {
            PortRowSense::AtLeastOne => RowBound::AtLeast(1.0),
            PortRowSense::AtMostOne => RowBound::AtMost(1.0),
        };
        RowLayout {
            port_rows: ports.rows().map(|row| (row, bound)).collect(),
            vessel_class_rows: vessel_classes
                .iter()
                .map(|vc| vessel_classes.vessel_class(vc).num_vessels() as f64)
                .collect(),
            objective_constant: ports.all_penalties(),
        }
    }
}

// methods
impl RowLayout {
    /// the port-role has to be served exactly once.
    pub fn with_equality(mut self, port: PortWithType) -> RowLayout {
        if let Some(row) = self.port_rows.iter_mut().find(|(p, _)| *p == port) {
            row.1 = RowBound::Exactly(1.0);
        }
        self
    }

    pub fn num_port_rows(&self) -> usize {
        self.port_rows.len()
    }

    pub fn port_rows(&self) -> &[(PortWithType, RowBound)] {
        &self.port_rows
    }

    pub fn vessel_class_rows(&self) -> &[f64] {
        &self.vessel_class_rows
    }

    pub fn objective_constant(&self) -> Cost {
        self.objective_constant
    }

    /// groups the duals of the port rows (in row order) by port.
    pub fn port_duals(&self, row_duals: &[f64]) -> HashMap<PortIdx, PortDual> {
        let mut duals: HashMap<PortIdx, PortDual> = HashMap::new();
        for (((port, port_type), _), dual) in self.port_rows.iter().zip(row_duals.iter()) {
            let entry = duals.entry(*port).or_default();
            match port_type {
                PortType::Pickup => entry.pickup = *dual,
                PortType::Delivery => entry.delivery = *dual,
                PortType::Both => {}
            }
        }
        duals
    }

    /// whether the columns weighted by `values` satisfy every row.
    pub fn is_feasible(&self, columns: &[Arc<Column>], values: &[f64], tolerance: f64) -> bool {
        let port_rows_ok = self.port_rows.iter().enumerate().all(|(row, (_, bound))| {
            let lhs: f64 = columns
                .iter()
                .zip(values.iter())
                .map(|(c, v)| c.port_coefficient(row) * v)
                .sum();
            bound.is_satisfied_by(lhs, tolerance)
        });
        let vessel_rows_ok = self.vessel_class_rows.iter().enumerate().all(|(vc, num)| {
            let lhs: f64 = columns
                .iter()
                .zip(values.iter())
                .map(|(c, v)| c.vessel_class_coefficients()[vc] * v)
                .sum();
            lhs <= num + tolerance
        });
        port_rows_ok && vessel_rows_ok
    }
}

/// Optimal solution of the LP relaxation.
#[derive(Debug, Clone)]
pub struct LinearSolution {
    pub objective: f64,
    pub port_duals: PortDuals,
    pub vessel_class_duals: Vec<f64>,
    pub values: Vec<f64>, // one per column, in pool order
}

impl LinearSolution {
    /// the columns with a value above `tolerance`, together with the value.
    pub fn basic_columns(
        &self,
        columns: &[Arc<Column>],
        tolerance: f64,
    ) -> Vec<(Arc<Column>, f64)> {
        columns
            .iter()
            .zip(self.values.iter())
            .filter(|(_, v)| **v > tolerance)
            .map(|(c, v)| (c.clone(), *v))
            .collect()
    }

    /// objective coefficient of the column net of the duals of its rows.
    pub fn reduced_cost(&self, layout: &RowLayout, column: &Column) -> f64 {
        let port_part: f64 = layout
            .port_rows()
            .iter()
            .enumerate()
            .map(|(row, ((port, port_type), _))| {
                let dual = self
                    .port_duals
                    .get(port)
                    .map(|d| d.of(*port_type))
                    .unwrap_or(0.0);
                dual * column.port_coefficient(row)
            })
            .sum();
        let vessel_part: f64 = column
            .vessel_class_coefficients()
            .iter()
            .zip(self.vessel_class_duals.iter())
            .map(|(c, d)| c * d)
            .sum();
        column.objective_coefficient() - port_part - vessel_part
    }
}

#[derive(Debug, Clone)]
pub struct IntegerSolution {
    pub objective: f64,
    pub values: Vec<f64>,
}

/// The LP/MIP solver of the restricted master problem.
pub trait MasterSolver {
    fn solve_lp(
        &self,
        layout: &RowLayout,
        columns: &[Arc<Column>],
    ) -> Result<LinearSolution, MasterError>;

    fn solve_mip(
        &self,
        layout: &RowLayout,
        columns: &[Arc<Column>],
    ) -> Result<IntegerSolution, MasterError>;
}
