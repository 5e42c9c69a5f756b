/*!
 * SRTF Scheduler
 * CPU service/termination and preemptive shortest-remaining-time dispatch
 */

use super::{Engine, TickEvent};
use crate::process::table::ProcessIdx;
use crate::process::ProcessState;
use log::info;

impl Engine {
    /// Apply one unit of CPU service to the process that was Running at the
    /// start of the tick. On reaching zero it terminates, frees its
    /// partition, and the CPU goes idle; it is not dispatched again this
    /// tick.
    pub(super) fn service_running(&mut self) {
        let Some(idx) = self.running else {
            return;
        };
        let now = self.clock;

        let finished = {
            let p = self.table.get_mut(idx);
            p.remaining_time -= 1;
            p.remaining_time == 0
        };
        if !finished {
            return;
        }

        self.running = None;
        let (pid, partition) = {
            let p = self.table.get_mut(idx);
            p.state = ProcessState::Terminated;
            p.finish_time = Some(now + 1);
            (p.pid, p.partition.take())
        };
        if let Some(part) = partition {
            let capacity = self.memory.get(part).capacity;
            self.memory.release(part);
            info!(
                "Tick {}: P{} terminated (finish {}), freed partition {}",
                now,
                pid,
                now + 1,
                part
            );
            self.push_event(TickEvent::Terminated {
                pid,
                partition: part,
                capacity,
            });
        }
    }

    /// Best Ready candidate under SRTF: minimal `(remaining_time,
    /// ready_since, pid)`. Recomputed on every consult; membership and
    /// tie-break keys can change twice within one tick (swap, then
    /// dispatch).
    fn ready_head(&self) -> Option<ProcessIdx> {
        self.table
            .in_state(ProcessState::Ready)
            .into_iter()
            .min_by_key(|&idx| {
                let p = self.table.get(idx);
                (p.remaining_time, p.ready_since, p.pid)
            })
    }

    /// Dispatch or preempt. An idle CPU takes the Ready head; a busy CPU is
    /// preempted only by a head with strictly smaller remaining time, or
    /// equal remaining time and an earlier `ready_since`.
    pub(super) fn dispatch(&mut self) {
        let now = self.clock;
        match self.running {
            None => {
                if let Some(head) = self.ready_head() {
                    self.run_process(head);
                    let (pid, remaining) = {
                        let p = self.table.get(head);
                        (p.pid, p.remaining_time)
                    };
                    self.push_event(TickEvent::Dispatched { pid, remaining });
                }
            }
            Some(run_idx) => {
                let Some(head) = self.ready_head() else {
                    return;
                };
                let (head_remaining, head_since) = {
                    let h = self.table.get(head);
                    (h.remaining_time, h.ready_since)
                };
                let (run_remaining, run_since) = {
                    let r = self.table.get(run_idx);
                    (r.remaining_time, r.ready_since)
                };

                let preempt = head_remaining < run_remaining
                    || (head_remaining == run_remaining && head_since < run_since);
                if !preempt {
                    return;
                }

                // The preempted process loses its former tie-break position:
                // it re-enters Ready stamped with the current tick.
                let preempted_pid = {
                    let r = self.table.get_mut(run_idx);
                    r.state = ProcessState::Ready;
                    r.ready_since = now;
                    r.pid
                };
                self.running = None;

                if let Some(next) = self.ready_head() {
                    self.run_process(next);
                    let (dispatched, remaining) = {
                        let p = self.table.get(next);
                        (p.pid, p.remaining_time)
                    };
                    info!(
                        "Tick {}: preempted P{} for P{} (remaining {})",
                        now, preempted_pid, dispatched, remaining
                    );
                    self.push_event(TickEvent::Preempted {
                        preempted: preempted_pid,
                        dispatched,
                        remaining,
                    });
                }
            }
        }
    }

    fn run_process(&mut self, idx: ProcessIdx) {
        let now = self.clock;
        let p = self.table.get_mut(idx);
        p.state = ProcessState::Running;
        if p.first_run_time.is_none() {
            p.first_run_time = Some(now);
        }
        info!(
            "Tick {}: dispatched P{} (remaining {})",
            now, p.pid, p.remaining_time
        );
        self.running = Some(idx);
    }
}
