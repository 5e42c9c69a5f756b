/*!
 * Admission Controller
 * Arrival admission under the system-slot limit, then Best-Fit placement
 * and swap-based replacement run to a fixed point
 */

use super::{Engine, TickEvent};
use crate::memory::PartitionId;
use crate::process::table::ProcessIdx;
use crate::process::ProcessState;
use log::{debug, info};

impl Engine {
    /// Move due processes (arrival_time <= now) from New into Suspended,
    /// in ascending `(arrival_time, pid)` order, while the system-slot
    /// count stays under the limit. Due processes left out remain in New
    /// and retry every tick; they are reported rejected for this tick.
    pub(super) fn admit_arrivals(&mut self) {
        let now = self.clock;
        let mut due: Vec<ProcessIdx> = self
            .table
            .in_state(ProcessState::New)
            .into_iter()
            .filter(|&idx| self.table.get(idx).arrival_time <= now)
            .collect();
        if due.is_empty() {
            return;
        }
        due.sort_by_key(|&idx| {
            let p = self.table.get(idx);
            (p.arrival_time, p.pid)
        });

        let max_capacity = self.memory.max_user_capacity();
        let mut slots = self.table.system_slot_count();
        let mut admitted = Vec::new();
        let mut oversize = Vec::new();
        let mut rejected = Vec::new();

        for idx in due {
            if slots < self.config.system_slot_limit {
                let p = self.table.get_mut(idx);
                p.state = ProcessState::Suspended;
                slots += 1;
                admitted.push(p.pid);
                // Oversize processes take a slot anyway; they can only ever
                // show up in the final report as never admitted.
                if p.size > max_capacity {
                    oversize.push((p.pid, p.size));
                }
            } else {
                rejected.push(self.table.get(idx).pid);
            }
        }

        if !admitted.is_empty() {
            info!("Tick {}: admitted into system: {:?}", now, admitted);
            self.push_event(TickEvent::Arrived { pids: admitted });
        }
        for (pid, size) in oversize {
            info!(
                "Tick {}: P{} ({} KB) exceeds every user partition (max {} KB)",
                now, pid, size, max_capacity
            );
            self.push_event(TickEvent::NeverFits {
                pid,
                size,
                max_capacity,
            });
        }
        if !rejected.is_empty() {
            info!(
                "Tick {}: due arrivals held in New, system slots full: {:?}",
                now, rejected
            );
            self.push_event(TickEvent::RejectedByCapacity { pids: rejected });
        }
    }

    /// Run placement/swap passes until a pass produces no change. A single
    /// tick can move several processes into memory, and a swap that evicts
    /// the running process leaves the CPU idle for the dispatch phase.
    pub(super) fn place_and_swap(&mut self) {
        let mut passes = 0;
        while self.placement_pass() {
            passes += 1;
        }
        if passes > 0 {
            debug!("Tick {}: placement fixed point after {} passes", self.clock, passes);
        }
    }

    /// One pass over Suspended in `(remaining_time, pid)` order. Returns
    /// true if a placement or swap happened (orderings must then be
    /// recomputed from scratch).
    fn placement_pass(&mut self) -> bool {
        let mut suspended = self.table.in_state(ProcessState::Suspended);
        suspended.sort_by_key(|&idx| {
            let p = self.table.get(idx);
            (p.remaining_time, p.pid)
        });

        for cand in suspended {
            let resident = self.table.resident_count();
            let size = self.table.get(cand).size;

            if resident < self.config.memory_resident_limit && self.memory.has_free() {
                if let Some(part) = self.memory.best_fit(size) {
                    self.load_into_memory(cand, part);
                    let pid = self.table.get(cand).pid;
                    let capacity = self.memory.get(part).capacity;
                    let internal_fragmentation = self.memory.get(part).internal_fragmentation();
                    self.push_event(TickEvent::Admitted {
                        pid,
                        size,
                        partition: part,
                        capacity,
                        internal_fragmentation,
                    });
                    return true;
                }
            } else if resident == self.config.memory_resident_limit && self.try_swap(cand) {
                return true;
            }
        }
        false
    }

    /// Evaluate a swap for one suspended candidate. Victims are residents
    /// whose partition capacity fits the candidate; the victim is the one
    /// maximizing `(remaining_time, pid)`, and the swap only executes when
    /// the candidate's remaining time is strictly smaller.
    fn try_swap(&mut self, cand: ProcessIdx) -> bool {
        let (cand_size, cand_remaining) = {
            let p = self.table.get(cand);
            (p.size, p.remaining_time)
        };

        let victim = self
            .table
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_resident())
            .filter(|(_, p)| match p.partition {
                Some(part) => self.memory.get(part).fits(cand_size),
                None => false,
            })
            .max_by_key(|(_, p)| (p.remaining_time, p.pid))
            .map(|(idx, _)| idx);

        let Some(victim) = victim else {
            return false;
        };
        if cand_remaining >= self.table.get(victim).remaining_time {
            return false;
        }

        if self.running == Some(victim) {
            self.running = None;
        }
        let (victim_pid, victim_remaining, part) = {
            let v = self.table.get_mut(victim);
            v.state = ProcessState::Suspended;
            let part = v.partition.take();
            (v.pid, v.remaining_time, part)
        };
        let Some(part) = part else {
            return false;
        };
        self.memory.release(part);
        self.load_into_memory(cand, part);

        let loaded_pid = self.table.get(cand).pid;
        info!(
            "Tick {}: swap: P{} (remaining {}) out, P{} (remaining {}) into partition {}",
            self.clock, victim_pid, victim_remaining, loaded_pid, cand_remaining, part
        );
        self.push_event(TickEvent::Swap {
            evicted: victim_pid,
            evicted_remaining: victim_remaining,
            loaded: loaded_pid,
            loaded_remaining: cand_remaining,
            partition: part,
        });
        true
    }

    /// Place a suspended process into a free partition: it becomes Ready
    /// with a fresh `ready_since` for scheduling tie-breaks.
    fn load_into_memory(&mut self, idx: ProcessIdx, part: PartitionId) {
        let now = self.clock;
        let (pid, size) = {
            let p = self.table.get_mut(idx);
            p.state = ProcessState::Ready;
            p.ready_since = now;
            p.partition = Some(part);
            (p.pid, p.size)
        };
        let placed = self.memory.assign(part, pid, size);
        debug_assert!(placed, "best-fit returned a partition that rejects the load");
    }
}
