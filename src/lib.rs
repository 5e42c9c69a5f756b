/*!
 * MFT + SRTF Simulation Engine
 * Discrete-time core combining SRTF scheduling with fixed-partition
 * (MFT) memory management: Best-Fit placement, capacity-bounded
 * admission and swapping, stepped one tick at a time by the host.
 */

pub mod core;
pub mod engine;
pub mod memory;
pub mod process;

// Re-exports
pub use crate::core::errors::EngineError;
pub use crate::core::types::{Address, EngineResult, Pid, Size, Tick};
pub use engine::{
    Averages, Engine, EngineConfig, FinalReport, ProcessOutcome, ProcessReport, SimStatus,
    Snapshot, TickEvent,
};
pub use memory::{MemoryManager, Partition, PartitionId, PartitionSpec};
pub use process::{Process, ProcessSpec, ProcessState};
