/*!
 * Final Report Builder
 * Per-process turnaround/waiting/response metrics and run aggregates
 */

use super::{Engine, SimStatus};
use crate::core::serde::is_none;
use crate::core::types::{Pid, Size, Tick};
use crate::process::{Process, ProcessState};
use serde::Serialize;

/// How a process ended the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProcessOutcome {
    Completed {
        first_run_time: Tick,
        finish_time: Tick,
        /// T = finish - arrival
        turnaround: Tick,
        /// W = T - burst
        waiting: Tick,
        /// R = first run - arrival
        response: Tick,
    },
    /// Too large for every user partition; no metrics apply
    NeverAdmitted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessReport {
    pub pid: Pid,
    pub size: Size,
    pub arrival_time: Tick,
    pub burst_time: u32,
    #[serde(flatten)]
    pub outcome: ProcessOutcome,
}

/// Arithmetic means over all terminated processes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Averages {
    pub turnaround: f64,
    pub waiting: f64,
    pub response: f64,
}

/// Final metrics for the run. Well-defined at any point, but only
/// semantically final once the engine reports `Finished` (or the safety
/// bound tripped).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FinalReport {
    /// Rows sorted by pid: terminated processes with metrics, plus
    /// never-admitted processes with an explicit marker
    pub processes: Vec<ProcessReport>,
    #[serde(skip_serializing_if = "is_none")]
    pub averages: Option<Averages>,
    /// Terminated count divided by elapsed ticks
    pub throughput: f64,
    pub completed: usize,
    pub elapsed_ticks: Tick,
    pub status: SimStatus,
}

impl Engine {
    pub fn final_report(&self) -> FinalReport {
        let mut rows: Vec<ProcessReport> = Vec::new();
        let mut sum_turnaround = 0u64;
        let mut sum_waiting = 0u64;
        let mut sum_response = 0u64;
        let mut completed = 0usize;

        for p in self.processes() {
            if let Some(row) = completed_row(p) {
                if let ProcessOutcome::Completed {
                    turnaround,
                    waiting,
                    response,
                    ..
                } = &row.outcome
                {
                    sum_turnaround += *turnaround;
                    sum_waiting += *waiting;
                    sum_response += *response;
                    completed += 1;
                }
                rows.push(row);
            } else if !self.memory.fits_any(p.size) {
                rows.push(ProcessReport {
                    pid: p.pid,
                    size: p.size,
                    arrival_time: p.arrival_time,
                    burst_time: p.burst_time,
                    outcome: ProcessOutcome::NeverAdmitted,
                });
            }
        }
        rows.sort_by_key(|r| r.pid);

        let averages = (completed > 0).then(|| {
            let n = completed as f64;
            Averages {
                turnaround: sum_turnaround as f64 / n,
                waiting: sum_waiting as f64 / n,
                response: sum_response as f64 / n,
            }
        });
        let elapsed = self.clock();
        let throughput = if elapsed > 0 {
            completed as f64 / elapsed as f64
        } else {
            0.0
        };

        FinalReport {
            processes: rows,
            averages,
            throughput,
            completed,
            elapsed_ticks: elapsed,
            status: self.status(),
        }
    }

}

fn completed_row(p: &Process) -> Option<ProcessReport> {
    if p.state != ProcessState::Terminated {
        return None;
    }
    let finish = p.finish_time?;
    let first_run = p.first_run_time?;
    let turnaround = finish - p.arrival_time;
    Some(ProcessReport {
        pid: p.pid,
        size: p.size,
        arrival_time: p.arrival_time,
        burst_time: p.burst_time,
        outcome: ProcessOutcome::Completed {
            first_run_time: first_run,
            finish_time: finish,
            turnaround,
            waiting: turnaround - u64::from(p.burst_time),
            response: first_run - p.arrival_time,
        },
    })
}
