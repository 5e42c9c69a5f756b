/*!
 * Simulation Engine
 * Tick driver: owns the process/partition state graph and advances it one
 * discrete time unit per call, in a fixed phase order
 */

use crate::core::types::{EngineResult, Pid, Tick};
use crate::memory::MemoryManager;
use crate::process::table::{ProcessIdx, ProcessTable};
use crate::process::{Process, ProcessSpec, ProcessState};
use log::{info, warn};

mod admission;
pub mod config;
mod dispatch;
mod report;
mod snapshot;
pub mod types;

pub use config::EngineConfig;
pub use report::{Averages, FinalReport, ProcessOutcome, ProcessReport};
pub use snapshot::{PartitionContents, PartitionView, ProcessView, RunningView, Snapshot};
pub use types::{SimStatus, TickEvent};

/// The scheduling-and-memory core. Single-threaded and discrete-time: every
/// phase of a tick runs to completion before the next, and a tick never
/// overlaps another. Hosts drive it with `tick()` and read state back
/// through `snapshot()` / `final_report()`.
pub struct Engine {
    clock: Tick,
    config: EngineConfig,
    table: ProcessTable,
    memory: MemoryManager,
    /// Slot of the process currently on the CPU
    running: Option<ProcessIdx>,
    /// Event log of the most recent tick (or of the t=0 bootstrap)
    events: Vec<TickEvent>,
    aborted: bool,
}

impl Engine {
    /// Construct with the reference configuration.
    pub fn new(specs: &[ProcessSpec]) -> EngineResult<Self> {
        Self::with_config(specs, EngineConfig::default())
    }

    /// Construct with an explicit configuration. Validates the contract
    /// (unique positive ids, positive sizes and bursts, sane layout), selects
    /// the cohort, and runs the t = 0 logic: arrivals due at tick 0 are
    /// admitted, placed, and the first dispatch decision is taken. No CPU
    /// service happens until the first `tick()`.
    pub fn with_config(specs: &[ProcessSpec], config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let table = ProcessTable::from_specs(specs, config.cohort_limit)?;
        let memory = MemoryManager::new(&config.partitions);

        info!(
            "Engine initialized: cohort of {}, {} partitions, slots {} / residents {}",
            table.len(),
            config.partitions.len(),
            config.system_slot_limit,
            config.memory_resident_limit
        );

        let mut engine = Self {
            clock: 0,
            config,
            table,
            memory,
            running: None,
            events: Vec::new(),
            aborted: false,
        };
        engine.admit_arrivals();
        engine.place_and_swap();
        engine.dispatch();
        Ok(engine)
    }

    /// Advance the simulation by exactly one time unit: (1) service the
    /// running process, terminating it if it finishes; (2) admit due
    /// arrivals; (3) run the placement/swap fixed point; (4) dispatch or
    /// preempt under SRTF. Never sleeps or blocks. Once the safety bound is
    /// hit the engine records an abnormal stop and no longer advances.
    pub fn tick(&mut self) {
        if self.aborted {
            return;
        }
        if self.clock >= self.config.safety_tick_limit {
            warn!(
                "Safety tick bound {} reached; declaring abnormal stop",
                self.config.safety_tick_limit
            );
            self.aborted = true;
            self.events = vec![TickEvent::SafetyStop { tick: self.clock }];
            return;
        }

        self.clock += 1;
        self.events.clear();
        self.service_running();
        self.admit_arrivals();
        self.place_and_swap();
        self.dispatch();
    }

    /// No further state change is possible: CPU idle, no Ready process, and
    /// nothing left in Suspended or New that could ever fit a user
    /// partition.
    pub fn is_finished(&self) -> bool {
        if self.running.is_some() || self.table.count_in_state(ProcessState::Ready) > 0 {
            return false;
        }
        let max_capacity = self.memory.max_user_capacity();
        !self.table.iter().any(|p| {
            matches!(p.state, ProcessState::New | ProcessState::Suspended)
                && p.size <= max_capacity
        })
    }

    pub fn status(&self) -> SimStatus {
        if self.is_finished() {
            SimStatus::Finished
        } else if self.aborted {
            SimStatus::SafetyLimit
        } else {
            SimStatus::Active
        }
    }

    /// Current simulation time.
    pub fn clock(&self) -> Tick {
        self.clock
    }

    /// Event log of the latest tick.
    pub fn events(&self) -> &[TickEvent] {
        &self.events
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn process(&self, pid: Pid) -> Option<&Process> {
        self.table.slot_of(pid).map(|idx| self.table.get(idx))
    }

    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.table.iter()
    }

    pub fn partitions(&self) -> &[crate::memory::Partition] {
        self.memory.partitions()
    }

    /// Pid of the process on the CPU, if any.
    pub fn running(&self) -> Option<Pid> {
        self.running.map(|idx| self.table.get(idx).pid)
    }

    pub(crate) fn push_event(&mut self, event: TickEvent) {
        self.events.push(event);
    }
}
