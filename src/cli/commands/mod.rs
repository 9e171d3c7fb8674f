pub mod check_methods;
pub mod select;

pub use check_methods::{execute_check_methods, MethodCheck};
pub use select::{execute_select, prepare_pattern, SelectionSummary};
