use derive_more::Display;
use model::base_types::{Cost, PortWithType, VesselClassIdx};
use model::ports::Ports;
use std::fmt;

use crate::Solution;

/// Which stage of the pricing produced a column.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnOrigin {
    #[display(fmt = "fast heuristic")]
    FastHeuristic,
    #[display(fmt = "elementary")]
    Elementary,
    #[display(fmt = "smart reduced")]
    SmartReduced,
    #[display(fmt = "reduced")]
    Reduced,
    #[display(fmt = "exact")]
    Exact,
    #[display(fmt = "mip")]
    Mip,
    #[display(fmt = "dummy")]
    Dummy,
}

/// A rotation as a variable of the master problem.
///
/// Port coefficients count how often each (port, role) row is visited: pickup rows
/// at `i - 1`, delivery rows at `(n - 1) + i - 1` for port `i`; the hub has no row.
/// Vessel class coefficients are one-hot. Immutable once created.
#[derive(Debug, Clone)]
pub struct Column {
    solution: Option<Solution>, // None for the dummy column
    objective_coefficient: Cost,
    port_coefficients: Vec<f64>,
    vessel_class_coefficients: Vec<f64>,
    origin: ColumnOrigin,
}

// static functions
impl Column {
    pub fn new(solution: Solution, num_vessel_classes: usize, origin: ColumnOrigin) -> Column {
        let ports = solution.graph().ports();
        let mut port_coefficients = vec![0.0; ports.num_rows()];
        for v in solution.port_calls() {
            let node = solution.graph().node(v);
            if let Some(row) = ports.row_of(node.port(), node.port_type()) {
                port_coefficients[row] += 1.0;
            }
        }

        let mut vessel_class_coefficients = vec![0.0; num_vessel_classes];
        vessel_class_coefficients[solution.vessel_class().idx()] = 1.0;

        // penalties of the served rows are saved by this rotation
        let objective_coefficient = solution.cost()
            - ports
                .rows()
                .zip(port_coefficients.iter())
                .map(|((port, port_type), coeff)| ports.port(port).penalty(port_type) * coeff)
                .sum::<Cost>();

        Column {
            solution: Some(solution),
            objective_coefficient,
            port_coefficients,
            vessel_class_coefficients,
            origin,
        }
    }

    /// covers every row once at a huge price; keeps the master feasible.
    pub fn dummy(ports: &Ports, num_vessel_classes: usize, price: Cost) -> Column {
        Column {
            solution: None,
            objective_coefficient: price,
            port_coefficients: vec![1.0; ports.num_rows()],
            vessel_class_coefficients: vec![0.0; num_vessel_classes],
            origin: ColumnOrigin::Dummy,
        }
    }
}

// methods
impl Column {
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    pub fn is_dummy(&self) -> bool {
        self.solution.is_none()
    }

    pub fn vessel_class(&self) -> Option<VesselClassIdx> {
        self.solution.as_ref().map(|s| s.vessel_class())
    }

    pub fn objective_coefficient(&self) -> Cost {
        self.objective_coefficient
    }

    pub fn port_coefficients(&self) -> &[f64] {
        &self.port_coefficients
    }

    pub fn port_coefficient(&self, row: usize) -> f64 {
        self.port_coefficients[row]
    }

    pub fn vessel_class_coefficients(&self) -> &[f64] {
        &self.vessel_class_coefficients
    }

    pub fn origin(&self) -> ColumnOrigin {
        self.origin
    }

    /// some row is visited more than once.
    pub fn has_cycles(&self) -> bool {
        self.port_coefficients.iter().any(|c| *c > 1.000001)
    }

    /// the dummy column counts as visiting everything.
    pub fn visits(&self, ports: &Ports, port: PortWithType) -> bool {
        match &self.solution {
            None => true,
            Some(_) => ports
                .row_of(port.0, port.1)
                .map(|row| self.port_coefficients[row] > 0.0)
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:>10.2} ({}) |", self.objective_coefficient, self.origin)?;
        let half = self.port_coefficients.len() / 2;
        for i in 0..half {
            write!(
                f,
                " {} {}",
                self.port_coefficients[i],
                self.port_coefficients[half + i]
            )?;
        }
        write!(f, " |")?;
        for c in self.vessel_class_coefficients.iter() {
            write!(f, " {}", c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use model::base_types::PortType;

    use super::*;
    use crate::test_utilities::{init_test_data, solution_through};

    #[test]
    fn coefficients_of_a_rotation() {
        let d = init_test_data();
        let solution =
            solution_through(&d.network, d.small, &[d.source, d.a_de, d.b_pu4, d.sink], -38.0);
        let column = Column::new(solution, 2, ColumnOrigin::Exact);

        // rows: A pu, B pu, A de, B de
        assert_eq!(column.port_coefficients(), &[0.0, 1.0, 1.0, 0.0]);
        assert_eq!(column.vessel_class_coefficients(), &[1.0, 0.0]);
        // cost 27 minus the penalties of B pickup (40) and A delivery (25)
        assert_eq!(column.objective_coefficient(), -38.0);
        assert!(!column.is_dummy());
        assert!(!column.has_cycles());
        assert_eq!(column.vessel_class(), Some(d.small));
        let ports = d.network.ports();
        assert!(column.visits(&ports, (d.port_a, PortType::Delivery)));
        assert!(!column.visits(&ports, (d.port_a, PortType::Pickup)));
    }

    #[test]
    fn dummy_column_covers_everything() {
        let d = init_test_data();
        let ports = d.network.ports();
        let dummy = Column::dummy(&ports, 2, 1e8);
        assert!(dummy.is_dummy());
        assert_eq!(dummy.origin(), ColumnOrigin::Dummy);
        assert_eq!(dummy.port_coefficients(), &[1.0; 4]);
        assert_eq!(dummy.vessel_class_coefficients(), &[0.0, 0.0]);
        assert_eq!(dummy.objective_coefficient(), 1e8);
        assert!(!dummy.has_cycles());
        assert!(dummy.visits(&ports, (d.port_b, PortType::Delivery)));
    }
}
