/*!
 * Engine Types
 * Tick event log entries and run status
 */

use crate::core::types::{Pid, Size, Tick};
use crate::memory::PartitionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall run status surfaced to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimStatus {
    /// Further state changes are still possible
    Active,
    /// No process is running, ready, or ever admissible again
    Finished,
    /// The safety tick bound was hit; abnormal stop, not completion
    SafetyLimit,
}

/// One entry in a tick's event log. `Display` renders the human-readable
/// line shown by the host; the typed form is what snapshots serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TickEvent {
    /// Due processes moved from New into the system (Suspended)
    Arrived { pids: Vec<Pid> },
    /// Due processes left in New because every system slot is taken
    RejectedByCapacity { pids: Vec<Pid> },
    /// Process admitted although it can never fit any user partition
    NeverFits {
        pid: Pid,
        size: Size,
        max_capacity: Size,
    },
    /// Best-Fit placement of a suspended process into a free partition
    Admitted {
        pid: Pid,
        size: Size,
        partition: PartitionId,
        capacity: Size,
        internal_fragmentation: Size,
    },
    /// Memory-resident victim evicted in favor of a shorter candidate
    Swap {
        evicted: Pid,
        evicted_remaining: u32,
        loaded: Pid,
        loaded_remaining: u32,
        partition: PartitionId,
    },
    /// CPU dispatch from an idle CPU
    Dispatched { pid: Pid, remaining: u32 },
    /// Running process displaced by a shorter ready process
    Preempted {
        preempted: Pid,
        dispatched: Pid,
        remaining: u32,
    },
    /// Running process exhausted its service and freed its partition
    Terminated {
        pid: Pid,
        partition: PartitionId,
        capacity: Size,
    },
    /// Safety tick bound reached; the run stops abnormally
    SafetyStop { tick: Tick },
}

fn pid_list(pids: &[Pid]) -> String {
    pids.iter()
        .map(|pid| format!("P{pid}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for TickEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickEvent::Arrived { pids } => write!(f, "Arrivals: {}", pid_list(pids)),
            TickEvent::RejectedByCapacity { pids } => write!(
                f,
                "Arrivals held in New (system slots full): {}",
                pid_list(pids)
            ),
            TickEvent::NeverFits {
                pid,
                size,
                max_capacity,
            } => write!(
                f,
                "P{pid} ({size} KB) does not fit any partition (max {max_capacity} KB)"
            ),
            TickEvent::Admitted {
                pid,
                size,
                partition,
                capacity,
                internal_fragmentation,
            } => write!(
                f,
                "Admitted P{pid} ({size} KB) -> partition {partition} ({capacity} KB), \
                 internal fragmentation {internal_fragmentation} KB"
            ),
            TickEvent::Swap {
                evicted,
                evicted_remaining,
                loaded,
                loaded_remaining,
                partition,
            } => write!(
                f,
                "Swap: P{evicted} (remaining {evicted_remaining}) out, \
                 P{loaded} (remaining {loaded_remaining}) in -> partition {partition}"
            ),
            TickEvent::Dispatched { pid, remaining } => {
                write!(f, "SRTF: dispatch P{pid} (remaining {remaining})")
            }
            TickEvent::Preempted {
                preempted,
                dispatched,
                remaining,
            } => write!(
                f,
                "SRTF: preempt P{preempted} -> dispatch P{dispatched} (remaining {remaining})"
            ),
            TickEvent::Terminated {
                pid,
                partition,
                capacity,
            } => write!(
                f,
                "P{pid} terminates -> frees partition {partition} ({capacity} KB)"
            ),
            TickEvent::SafetyStop { tick } => {
                write!(f, "Safety bound reached at tick {tick}; stopping abnormally")
            }
        }
    }
}
