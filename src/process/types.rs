/*!
 * Process Types
 * Process definitions, lifecycle states, and dynamic scheduling fields
 */

use crate::core::types::{Pid, Size, Tick};
use crate::memory::PartitionId;
use serde::{Deserialize, Serialize};

/// Validated process definition supplied by the host (CSV loader, editor).
///
/// Identity and demand are immutable once the engine is constructed; the
/// engine rejects definitions that violate the domain contract (`pid > 0`
/// unique, `size > 0`, `burst_time > 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessSpec {
    pub pid: Pid,
    /// Memory demand in KB
    pub size: Size,
    /// Tick at which the process becomes eligible to enter the system
    pub arrival_time: Tick,
    /// Total CPU service demand in ticks
    pub burst_time: u32,
}

impl ProcessSpec {
    pub fn new(pid: Pid, size: Size, arrival_time: Tick, burst_time: u32) -> Self {
        Self {
            pid,
            size,
            arrival_time,
            burst_time,
        }
    }
}

/// Process lifecycle state
///
/// New -> Suspended -> Ready <-> Running -> Terminated. Suspended <-> Ready
/// may cycle via swap-out/swap-in; Ready <-> Running via preemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Not yet admitted into the system
    New,
    /// Holds a system slot but no memory partition (ready/suspended)
    Suspended,
    /// Memory-resident, waiting for the CPU
    Ready,
    /// Currently on the CPU
    Running,
    /// Finished all CPU service
    Terminated,
}

/// A simulated process: immutable definition plus engine-owned dynamics.
#[derive(Debug, Clone)]
pub struct Process {
    pub pid: Pid,
    pub size: Size,
    pub arrival_time: Tick,
    pub burst_time: u32,

    pub state: ProcessState,
    /// CPU service still owed; drives every SRTF decision
    pub remaining_time: u32,
    /// Occupied partition; `Some` iff state is Ready or Running
    pub partition: Option<PartitionId>,
    /// Tick of the most recent transition into Ready (scheduling tie-break)
    pub ready_since: Tick,
    /// Set exactly once, on first dispatch
    pub first_run_time: Option<Tick>,
    /// Set exactly once, on termination
    pub finish_time: Option<Tick>,
}

impl Process {
    pub fn from_spec(spec: ProcessSpec) -> Self {
        Self {
            pid: spec.pid,
            size: spec.size,
            arrival_time: spec.arrival_time,
            burst_time: spec.burst_time,
            state: ProcessState::New,
            remaining_time: spec.burst_time,
            partition: None,
            ready_since: 0,
            first_run_time: None,
            finish_time: None,
        }
    }

    pub fn is_resident(&self) -> bool {
        matches!(self.state, ProcessState::Ready | ProcessState::Running)
    }

    /// Completion percentage for host display (0.0 - 100.0)
    pub fn progress_percent(&self) -> f64 {
        if self.burst_time == 0 {
            return 0.0;
        }
        if self.state == ProcessState::Terminated {
            return 100.0;
        }
        let executed = self.burst_time - self.remaining_time;
        (f64::from(executed) / f64::from(self.burst_time) * 100.0).clamp(0.0, 100.0)
    }
}
