/*!
 * Engine Integration Tests
 * Scenario-level coverage: Best-Fit placement, SRTF dispatch/preemption,
 * capacity-bounded admission, swapping, safety bound, and final metrics
 */

use mft_sim::{
    Averages, Engine, EngineConfig, PartitionSpec, ProcessOutcome, ProcessSpec, ProcessState,
    SimStatus, TickEvent,
};
use pretty_assertions::assert_eq;

fn spec(pid: u32, size: u32, arrival: u64, burst: u32) -> ProcessSpec {
    ProcessSpec::new(pid, size, arrival, burst)
}

fn run_to_end(engine: &mut Engine) {
    let _ = env_logger::builder().is_test(true).try_init();
    while !engine.is_finished() && engine.status() != SimStatus::SafetyLimit {
        engine.tick();
    }
}

#[test]
fn test_bootstrap_places_and_dispatches_shortest() {
    // P2 has the shorter burst: it wins both the placement ordering and the
    // CPU at t = 0.
    let mut engine = Engine::new(&[spec(1, 120, 0, 5), spec(2, 40, 0, 3)]).unwrap();

    let snap = engine.snapshot();
    assert_eq!(snap.tick, 0);
    assert_eq!(snap.running.as_ref().map(|r| r.pid), Some(2));
    assert_eq!(snap.ready, vec![1]);
    assert!(snap.new.is_empty());
    assert!(snap.suspended.is_empty());

    // Best-Fit, never first-fit: P2 (40 KB) minimizes leftover in the 50 KB
    // partition, P1 (120 KB) in the 150 KB one; the 250 KB partition stays
    // free even though it is scanned first.
    assert_eq!(engine.process(2).unwrap().partition, Some(3));
    assert_eq!(engine.process(1).unwrap().partition, Some(2));
    assert_eq!(snap.partitions[3].internal_fragmentation, 10);
    assert_eq!(snap.partitions[2].internal_fragmentation, 30);
    assert!(engine.partitions()[1].is_free());

    engine.tick();
    let snap = engine.snapshot();
    assert_eq!(snap.tick, 1);
    assert_eq!(snap.running.as_ref().map(|r| r.pid), Some(2));
    assert_eq!(snap.running.as_ref().map(|r| r.remaining_time), Some(2));
    assert_eq!(engine.process(1).unwrap().state, ProcessState::Ready);
}

#[test]
fn test_two_process_run_metrics() {
    let mut engine = Engine::new(&[spec(1, 120, 0, 5), spec(2, 40, 0, 3)]).unwrap();
    run_to_end(&mut engine);

    assert_eq!(engine.status(), SimStatus::Finished);
    assert_eq!(engine.clock(), 8);

    let report = engine.final_report();
    assert_eq!(report.completed, 2);
    assert_eq!(report.elapsed_ticks, 8);
    assert!((report.throughput - 0.25).abs() < 1e-9);

    // P2 runs [0..3], finishes at 4 under the reference clock convention;
    // P1 takes over at tick 3 and finishes at 9.
    assert_eq!(
        report.processes[1].outcome,
        ProcessOutcome::Completed {
            first_run_time: 0,
            finish_time: 4,
            turnaround: 4,
            waiting: 1,
            response: 0,
        }
    );
    assert_eq!(
        report.processes[0].outcome,
        ProcessOutcome::Completed {
            first_run_time: 3,
            finish_time: 9,
            turnaround: 9,
            waiting: 4,
            response: 3,
        }
    );
    assert_eq!(
        report.averages,
        Some(Averages {
            turnaround: 6.5,
            waiting: 2.5,
            response: 1.5,
        })
    );
}

#[test]
fn test_oversize_process_never_admitted() {
    let mut engine = Engine::new(&[spec(1, 300, 0, 4), spec(2, 40, 0, 3)]).unwrap();

    // Admitted into the system anyway, flagged as unplaceable.
    assert_eq!(engine.process(1).unwrap().state, ProcessState::Suspended);
    assert!(engine.events().iter().any(|e| matches!(
        e,
        TickEvent::NeverFits {
            pid: 1,
            size: 300,
            max_capacity: 250
        }
    )));

    run_to_end(&mut engine);
    assert_eq!(engine.status(), SimStatus::Finished);

    // It never left Suspended and never blocked P2.
    let p1 = engine.process(1).unwrap();
    assert_eq!(p1.state, ProcessState::Suspended);
    assert_eq!(p1.partition, None);

    let report = engine.final_report();
    assert_eq!(report.completed, 1);
    assert_eq!(report.processes[0].outcome, ProcessOutcome::NeverAdmitted);
    assert!(matches!(
        report.processes[1].outcome,
        ProcessOutcome::Completed { .. }
    ));
}

#[test]
fn test_no_swap_when_residents_are_shorter() {
    // Memory full with three 2-tick residents; the 5-tick candidate must
    // not displace any of them.
    let mut engine = Engine::new(&[
        spec(1, 40, 0, 2),
        spec(2, 40, 0, 2),
        spec(3, 100, 0, 2),
        spec(4, 40, 0, 5),
    ])
    .unwrap();

    assert_eq!(engine.process(4).unwrap().state, ProcessState::Suspended);
    assert!(!engine
        .events()
        .iter()
        .any(|e| matches!(e, TickEvent::Swap { .. })));

    let snap = engine.snapshot();
    assert_eq!(snap.running.as_ref().map(|r| r.pid), Some(1));
    assert_eq!(snap.ready, vec![2, 3]);
    assert_eq!(snap.suspended, vec![4]);
}

#[test]
fn test_swap_evicts_longest_remaining_victim() {
    let mut engine = Engine::new(&[
        spec(1, 40, 0, 2),
        spec(2, 40, 0, 2),
        spec(3, 100, 0, 2),
        spec(4, 40, 1, 1),
    ])
    .unwrap();

    engine.tick();

    // P4 (remaining 1) displaces the longest-remaining resident; the tie
    // between P2 and P3 (both remaining 2) goes to the larger pid.
    assert!(engine.events().iter().any(|e| matches!(
        e,
        TickEvent::Swap {
            evicted: 3,
            loaded: 4,
            partition: 1,
            ..
        }
    )));
    assert_eq!(engine.process(3).unwrap().state, ProcessState::Suspended);
    assert_eq!(engine.process(3).unwrap().partition, None);
    assert_eq!(engine.process(4).unwrap().state, ProcessState::Ready);
    assert_eq!(engine.process(4).unwrap().partition, Some(1));

    // Equal remaining times but the running process has the earlier
    // ready_since: no preemption.
    assert_eq!(engine.running(), Some(1));
}

#[test]
fn test_preemption_by_shorter_arrival() {
    let mut engine = Engine::new(&[spec(1, 40, 0, 10), spec(2, 40, 1, 2)]).unwrap();
    assert_eq!(engine.running(), Some(1));

    engine.tick();

    assert!(engine.events().iter().any(|e| matches!(
        e,
        TickEvent::Preempted {
            preempted: 1,
            dispatched: 2,
            remaining: 2
        }
    )));
    assert_eq!(engine.running(), Some(2));
    let p1 = engine.process(1).unwrap();
    assert_eq!(p1.state, ProcessState::Ready);
    assert_eq!(p1.ready_since, 1);
    // Preemption keeps the partition: P1 stays memory-resident.
    assert!(p1.partition.is_some());
    assert_eq!(engine.process(2).unwrap().first_run_time, Some(1));
}

#[test]
fn test_system_slot_limit_defers_arrivals() {
    let specs: Vec<ProcessSpec> = (1..=7).map(|pid| spec(pid, 40, 0, pid)).collect();
    let mut engine = Engine::new(&specs).unwrap();

    // Only five slots: P6 and P7 stay in New and are reported rejected.
    let snap = engine.snapshot();
    assert_eq!(snap.new, vec![6, 7]);
    assert!(engine.events().iter().any(
        |e| matches!(e, TickEvent::RejectedByCapacity { pids } if *pids == vec![6, 7])
    ));

    engine.tick();
    // P1 (burst 1) terminated, freeing a slot for P6; P7 keeps retrying.
    assert_eq!(engine.process(1).unwrap().state, ProcessState::Terminated);
    assert_ne!(engine.process(6).unwrap().state, ProcessState::New);
    assert_eq!(engine.process(7).unwrap().state, ProcessState::New);

    run_to_end(&mut engine);
    assert_eq!(engine.final_report().completed, 7);
}

#[test]
fn test_safety_bound_reports_abnormal_stop() {
    let config = EngineConfig {
        safety_tick_limit: 5,
        ..Default::default()
    };
    let mut engine = Engine::with_config(&[spec(1, 40, 0, 100)], config).unwrap();

    for _ in 0..10 {
        engine.tick();
    }

    assert_eq!(engine.clock(), 5);
    assert_eq!(engine.status(), SimStatus::SafetyLimit);
    assert!(engine
        .events()
        .iter()
        .any(|e| matches!(e, TickEvent::SafetyStop { tick: 5 })));
    assert!(!engine.is_finished());
    assert_eq!(engine.final_report().status, SimStatus::SafetyLimit);
}

#[test]
fn test_oversize_blockade_hits_safety_bound() {
    // Five unplaceable processes pin every system slot, so the placeable
    // P6 can never leave New: the run ends at the safety bound, not in
    // normal completion.
    let mut specs: Vec<ProcessSpec> = (1..=5).map(|pid| spec(pid, 300, 0, 2)).collect();
    specs.push(spec(6, 40, 1, 2));
    let mut engine = Engine::new(&specs).unwrap();

    run_to_end(&mut engine);

    assert_eq!(engine.status(), SimStatus::SafetyLimit);
    assert_eq!(engine.clock(), 500);
    assert_eq!(engine.process(6).unwrap().state, ProcessState::New);
    assert_eq!(engine.final_report().completed, 0);
    assert_eq!(
        engine
            .final_report()
            .processes
            .iter()
            .filter(|r| r.outcome == ProcessOutcome::NeverAdmitted)
            .count(),
        5
    );
}

#[test]
fn test_cohort_truncation() {
    let config = EngineConfig {
        cohort_limit: 2,
        ..Default::default()
    };
    let specs = vec![spec(1, 40, 3, 2), spec(2, 40, 0, 2), spec(3, 40, 1, 2)];
    let mut engine = Engine::with_config(&specs, config).unwrap();

    // Cohort is the first two by (arrival, pid): P2 and P3. P1 is never
    // simulated.
    assert_eq!(engine.processes().count(), 2);
    assert!(engine.process(1).is_none());

    run_to_end(&mut engine);
    assert_eq!(engine.final_report().completed, 2);
}

#[test]
fn test_empty_cohort_finishes_immediately() {
    let engine = Engine::new(&[]).unwrap();
    assert!(engine.is_finished());
    assert_eq!(engine.status(), SimStatus::Finished);

    let report = engine.final_report();
    assert_eq!(report.completed, 0);
    assert_eq!(report.throughput, 0.0);
    assert_eq!(report.averages, None);
}

#[test]
fn test_construction_contract_violations() {
    assert!(Engine::new(&[spec(1, 40, 0, 2), spec(1, 50, 0, 3)]).is_err());
    assert!(Engine::new(&[spec(0, 40, 0, 2)]).is_err());

    let config = EngineConfig {
        partitions: vec![PartitionSpec::reserved(100)],
        ..Default::default()
    };
    assert!(Engine::with_config(&[], config).is_err());
}

#[test]
fn test_snapshot_serialization_shape() {
    let engine = Engine::new(&[spec(1, 120, 0, 5), spec(2, 40, 0, 3)]).unwrap();
    let value = serde_json::to_value(engine.snapshot()).unwrap();

    assert_eq!(value["tick"], 0);
    assert_eq!(value["status"], "active");
    assert_eq!(value["running"]["pid"], 2);
    assert_eq!(value["partitions"][0]["contents"]["kind"], "reserved");
    assert_eq!(value["partitions"][1]["contents"]["kind"], "free");
    assert_eq!(value["partitions"][3]["contents"]["pid"], 2);
    assert_eq!(value["partitions"][3]["internal_fragmentation"], 10);
    assert_eq!(value["processes"][0]["state"], "ready");
    assert!(value["events"].as_array().is_some_and(|e| !e.is_empty()));
}

#[test]
fn test_event_display_lines() {
    let engine = Engine::new(&[spec(1, 120, 0, 5), spec(2, 40, 0, 3)]).unwrap();
    let lines: Vec<String> = engine.events().iter().map(ToString::to_string).collect();

    assert_eq!(lines[0], "Arrivals: P1, P2");
    assert!(lines
        .iter()
        .any(|l| l.contains("Admitted P2 (40 KB) -> partition 3 (50 KB)")));
    assert!(lines.iter().any(|l| l == "SRTF: dispatch P2 (remaining 3)"));
}
