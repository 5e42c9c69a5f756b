/*!
 * Error Types
 * Centralized construction-contract errors with thiserror and serde support
 */

use crate::core::types::Pid;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine construction errors.
///
/// Input validation (filtering bad CSV rows, deduplicating ids) is the
/// host's job; the engine fails fast on contract violations instead of
/// repairing data. Capacity deadlock and non-termination are not errors:
/// they surface as explicit status in snapshots and reports.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum EngineError {
    #[error("Invalid process definition (pid {pid}): {reason}")]
    InvalidDefinition { pid: Pid, reason: String },

    #[error("Duplicate process id: {0}")]
    DuplicatePid(Pid),

    #[error("Partition {index} has zero capacity")]
    ZeroCapacityPartition { index: usize },

    #[error("Partition layout has no allocatable (non-reserved) partition")]
    NoAllocatablePartition,

    #[error("Invalid limit: {name} must be positive")]
    ZeroLimit { name: &'static str },
}
