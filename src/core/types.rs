/*!
 * Core Types
 * Common types used across the simulation engine
 */

/// Process ID type
pub type Pid = u32;

/// Memory size type (KB)
pub type Size = u32;

/// Discrete simulation time unit
pub type Tick = u64;

/// Base address of a memory partition (KB offset)
pub type Address = u32;

/// Common result type for engine operations
pub type EngineResult<T> = Result<T, super::errors::EngineError>;
