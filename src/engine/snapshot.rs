/*!
 * Snapshot Builder
 * Read-only projection of engine state for live host display
 */

use super::{Engine, SimStatus};
use crate::core::serde::{is_empty_vec, is_none, is_zero_u32};
use crate::core::types::{Address, Pid, Size, Tick};
use crate::memory::{Partition, PartitionId};
use crate::process::{Process, ProcessState};
use serde::Serialize;

/// The process currently on the CPU.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RunningView {
    pub pid: Pid,
    pub remaining_time: u32,
}

/// What a partition currently holds.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartitionContents {
    /// OS partition, never allocatable
    Reserved,
    Free,
    Occupied { pid: Pid, size: Size },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PartitionView {
    pub id: PartitionId,
    pub base_address: Address,
    pub capacity: Size,
    pub contents: PartitionContents,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub internal_fragmentation: Size,
}

/// Per-process table row, as the host's process table renders it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessView {
    pub pid: Pid,
    pub size: Size,
    pub arrival_time: Tick,
    pub burst_time: u32,
    pub remaining_time: u32,
    pub state: ProcessState,
    /// Completion percentage (0.0 - 100.0)
    pub progress: f64,
}

/// Read-only copy of the engine state at the current tick. Queue contents
/// are ordered id lists: ready in dispatch order, suspended in admission
/// order, new in arrival order, terminated in finish order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Snapshot {
    pub tick: Tick,
    pub status: SimStatus,
    /// Human-readable event lines for the latest tick
    #[serde(skip_serializing_if = "is_empty_vec")]
    pub events: Vec<String>,
    #[serde(skip_serializing_if = "is_none")]
    pub running: Option<RunningView>,
    pub ready: Vec<Pid>,
    pub suspended: Vec<Pid>,
    pub new: Vec<Pid>,
    pub terminated: Vec<Pid>,
    pub partitions: Vec<PartitionView>,
    pub processes: Vec<ProcessView>,
}

fn sorted_pids<K: Ord>(procs: Vec<&Process>, key: impl Fn(&Process) -> K) -> Vec<Pid> {
    let mut procs = procs;
    procs.sort_by_key(|p| key(*p));
    procs.iter().map(|p| p.pid).collect()
}

impl Engine {
    /// Assemble a pure copy of the current state; never mutates the engine.
    pub fn snapshot(&self) -> Snapshot {
        let in_state =
            |state: ProcessState| self.processes().filter(|p| p.state == state).collect::<Vec<_>>();

        let running = self.running().and_then(|pid| self.process(pid)).map(|p| {
            RunningView {
                pid: p.pid,
                remaining_time: p.remaining_time,
            }
        });

        Snapshot {
            tick: self.clock(),
            status: self.status(),
            events: self.events().iter().map(ToString::to_string).collect(),
            running,
            ready: sorted_pids(in_state(ProcessState::Ready), |p| {
                (p.remaining_time, p.ready_since, p.pid)
            }),
            suspended: sorted_pids(in_state(ProcessState::Suspended), |p| {
                (p.remaining_time, p.pid)
            }),
            new: sorted_pids(in_state(ProcessState::New), |p| (p.arrival_time, p.pid)),
            terminated: sorted_pids(in_state(ProcessState::Terminated), |p| {
                (p.finish_time, p.pid)
            }),
            partitions: self.partitions().iter().map(partition_view).collect(),
            processes: self.processes().map(process_view).collect(),
        }
    }
}

fn partition_view(part: &Partition) -> PartitionView {
    let contents = if part.reserved {
        PartitionContents::Reserved
    } else {
        match part.occupant {
            Some(occ) => PartitionContents::Occupied {
                pid: occ.pid,
                size: occ.size,
            },
            None => PartitionContents::Free,
        }
    };
    PartitionView {
        id: part.id,
        base_address: part.base_address,
        capacity: part.capacity,
        contents,
        internal_fragmentation: part.internal_fragmentation(),
    }
}

fn process_view(p: &Process) -> ProcessView {
    ProcessView {
        pid: p.pid,
        size: p.size,
        arrival_time: p.arrival_time,
        burst_time: p.burst_time,
        remaining_time: p.remaining_time,
        state: p.state,
        progress: p.progress_percent(),
    }
}
