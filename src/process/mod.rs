/*!
 * Process Module
 * Process data model and the simulated cohort table
 */

pub mod table;
pub mod types;

// Re-export for convenience
pub use table::ProcessTable;
pub use types::{Process, ProcessSpec, ProcessState};
