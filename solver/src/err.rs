use derive_more::{Display, From};

use crate::master::MasterError;

/// Failures that end a branch-and-price run. Infeasible master problems are
/// handled inside the tree and never end up here.
#[derive(Debug, Display, From)]
pub enum SolverError {
    #[display(fmt = "{}", _0)]
    Master(MasterError),
}

impl std::error::Error for SolverError {}
