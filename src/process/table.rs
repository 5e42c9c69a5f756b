/*!
 * Process Table
 * Arena-indexed cohort storage: validation, selection, and state queries
 */

use super::types::{Process, ProcessSpec, ProcessState};
use crate::core::errors::EngineError;
use crate::core::types::{EngineResult, Pid};
use std::collections::HashSet;

/// Slot index into the process table (stable for the whole run).
pub type ProcessIdx = usize;

/// Owns every simulated process. Mutual Process/Partition references are
/// expressed as arena indices, never as owning pointers; the engine looks
/// processes up by slot in O(1) and queues are recomputed orderings over
/// state-filtered slots.
#[derive(Debug, Clone)]
pub struct ProcessTable {
    procs: Vec<Process>,
}

impl ProcessTable {
    /// Validate the supplied definitions and select the simulated cohort:
    /// ascending `(arrival_time, pid)`, truncated to `cohort_limit`.
    /// Definitions beyond the cohort are never simulated.
    pub fn from_specs(specs: &[ProcessSpec], cohort_limit: usize) -> EngineResult<Self> {
        let mut seen: HashSet<Pid> = HashSet::with_capacity(specs.len());
        for spec in specs {
            if spec.pid == 0 {
                return Err(EngineError::InvalidDefinition {
                    pid: spec.pid,
                    reason: "pid must be positive".into(),
                });
            }
            if spec.size == 0 {
                return Err(EngineError::InvalidDefinition {
                    pid: spec.pid,
                    reason: "size must be positive".into(),
                });
            }
            if spec.burst_time == 0 {
                return Err(EngineError::InvalidDefinition {
                    pid: spec.pid,
                    reason: "burst_time must be positive".into(),
                });
            }
            if !seen.insert(spec.pid) {
                return Err(EngineError::DuplicatePid(spec.pid));
            }
        }

        let mut cohort: Vec<ProcessSpec> = specs.to_vec();
        cohort.sort_by_key(|s| (s.arrival_time, s.pid));
        cohort.truncate(cohort_limit);

        Ok(Self {
            procs: cohort.into_iter().map(Process::from_spec).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }

    pub fn get(&self, idx: ProcessIdx) -> &Process {
        &self.procs[idx]
    }

    pub fn get_mut(&mut self, idx: ProcessIdx) -> &mut Process {
        &mut self.procs[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.procs.iter()
    }

    pub fn slot_of(&self, pid: Pid) -> Option<ProcessIdx> {
        self.procs.iter().position(|p| p.pid == pid)
    }

    /// Slots currently in `state`, in table order.
    pub fn in_state(&self, state: ProcessState) -> Vec<ProcessIdx> {
        self.procs
            .iter()
            .enumerate()
            .filter(|(_, p)| p.state == state)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn count_in_state(&self, state: ProcessState) -> usize {
        self.procs.iter().filter(|p| p.state == state).count()
    }

    /// Processes "inside the system": Suspended, Ready, or Running.
    pub fn system_slot_count(&self) -> usize {
        self.procs
            .iter()
            .filter(|p| {
                matches!(
                    p.state,
                    ProcessState::Suspended | ProcessState::Ready | ProcessState::Running
                )
            })
            .count()
    }

    /// Memory-resident processes: Ready or Running.
    pub fn resident_count(&self) -> usize {
        self.procs.iter().filter(|p| p.is_resident()).count()
    }
}
