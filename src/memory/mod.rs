/*!
 * Memory Module
 * Fixed-partition (MFT) memory management with Best-Fit placement
 */

pub mod manager;
pub mod types;

// Re-export for convenience
pub use manager::MemoryManager;
pub use types::{Partition, PartitionId, PartitionOccupant, PartitionSpec};
