pub mod column;
pub mod column_pool;
pub mod json_serialisation;
mod solution;
pub mod solution_costs;
pub mod test_utilities;

pub use column::{Column, ColumnOrigin};
pub use column_pool::{ColumnPool, GlobalColumnPool};
pub use solution::Solution;
