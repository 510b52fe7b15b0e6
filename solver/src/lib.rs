pub mod branching;
pub mod column_generation;
pub mod err;
pub mod heuristics;
pub mod label;
pub mod labelling;
pub mod master;
pub mod monitor;
pub mod network_view;
pub mod node;
pub mod pricing;
pub mod reduction;
pub mod report;
pub mod result;
pub mod stats;
pub mod test_utilities;
pub mod tree;

pub use err::SolverError;
pub use master::{MasterError, MasterSolver};
pub use result::{TreeOutcome, TreeResult};
pub use tree::BranchAndPrice;
