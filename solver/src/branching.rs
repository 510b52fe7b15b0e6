pub mod cycle;
pub mod rules;
pub mod selection;

pub use rules::BranchingRule;
pub use selection::{select_branching, BranchingDecision, BranchingKind};
