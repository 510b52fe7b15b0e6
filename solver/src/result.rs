use derive_more::Display;
use solution::Column;
use std::sync::Arc;

use crate::stats::TreeStatistics;

/// Where the incumbent came from.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundType {
    #[display(fmt = "lp")]
    FromLp,
    #[display(fmt = "mip")]
    FromMip,
}

/// The best integer solution found so far.
#[derive(Debug, Clone)]
pub struct Incumbent {
    objective: f64,
    columns: Vec<(Arc<Column>, f64)>,
    bound_type: BoundType,
    node: usize,
}

impl Incumbent {
    pub fn new(
        objective: f64,
        columns: Vec<(Arc<Column>, f64)>,
        bound_type: BoundType,
        node: usize,
    ) -> Incumbent {
        Incumbent {
            objective,
            columns,
            bound_type,
            node,
        }
    }

    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// the chosen columns with their (integral) values.
    pub fn columns(&self) -> &[(Arc<Column>, f64)] {
        &self.columns
    }

    pub fn bound_type(&self) -> BoundType {
        self.bound_type
    }

    /// number of the node it was found at.
    pub fn node(&self) -> usize {
        self.node
    }
}

#[derive(Debug, Clone)]
pub enum TreeResult {
    Optimal(Incumbent),
    Feasible(Incumbent),
    Infeasible,
}

#[derive(Display, Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    #[display(fmt = "optimality proven")]
    OptimalityProven,
    #[display(fmt = "infeasibility proven")]
    InfeasibilityProven,
    #[display(fmt = "time limit")]
    TimeLimit,
}

#[derive(Debug, Clone)]
pub struct TreeOutcome {
    result: TreeResult,
    termination_reason: TerminationReason,
    lower_bound: f64,
    statistics: TreeStatistics,
}

impl TreeOutcome {
    pub fn optimal(incumbent: Incumbent, statistics: TreeStatistics) -> Self {
        Self {
            lower_bound: incumbent.objective(),
            result: TreeResult::Optimal(incumbent),
            termination_reason: TerminationReason::OptimalityProven,
            statistics,
        }
    }

    pub fn infeasible(statistics: TreeStatistics) -> Self {
        Self {
            result: TreeResult::Infeasible,
            termination_reason: TerminationReason::InfeasibilityProven,
            lower_bound: f64::INFINITY,
            statistics,
        }
    }

    /// stopped by the time limit with the given global lower bound.
    pub fn timed_out(
        incumbent: Option<Incumbent>,
        lower_bound: f64,
        statistics: TreeStatistics,
    ) -> Self {
        let result = match incumbent {
            Some(incumbent) => TreeResult::Feasible(incumbent),
            None => TreeResult::Infeasible,
        };
        Self {
            result,
            termination_reason: TerminationReason::TimeLimit,
            lower_bound,
            statistics,
        }
    }

    pub fn result(&self) -> &TreeResult {
        &self.result
    }

    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    pub fn statistics(&self) -> &TreeStatistics {
        &self.statistics
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn incumbent(&self) -> Option<&Incumbent> {
        match &self.result {
            TreeResult::Optimal(incumbent) | TreeResult::Feasible(incumbent) => Some(incumbent),
            TreeResult::Infeasible => None,
        }
    }

    /// relative gap in percent; infinite without incumbent.
    pub fn gap(&self) -> f64 {
        match self.incumbent() {
            Some(incumbent) => relative_gap(incumbent.objective(), self.lower_bound),
            None => f64::INFINITY,
        }
    }
}

/// `|ub - lb| / |ub|` in percent.
pub fn relative_gap(upper_bound: f64, lower_bound: f64) -> f64 {
    if !upper_bound.is_finite() || !lower_bound.is_finite() {
        f64::INFINITY
    } else if upper_bound.abs() < 1e-9 {
        if (upper_bound - lower_bound).abs() < 1e-9 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        (upper_bound - lower_bound).abs() / upper_bound.abs() * 100.0
    }
}
