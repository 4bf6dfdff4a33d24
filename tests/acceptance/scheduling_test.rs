//! End-to-end scheduling behavior through the public dispatcher surface.

use crate::acceptance::common::{counting_action, fire_log, fires, logged, tagging_action};
use tick_common::SchedError;
use tick_core::{Mode, Scheduler};

#[test]
fn callback_capacity_is_enforced() {
    let mut sched: Scheduler<3, 4> = Scheduler::with_defaults();

    for _ in 0..3 {
        let (action, _) = counting_action();
        assert!(sched.register_callback(action, 10).is_ok());
    }

    let (overflow, _) = counting_action();
    let err = sched.register_callback(overflow, 10).unwrap_err();
    assert!(matches!(err, SchedError::CapacityExceeded { table: "callback", capacity: 3 }));
    assert_eq!(sched.callback_count(), 3);
}

#[test]
fn callout_capacity_is_enforced() {
    let mut sched: Scheduler<2, 3> = Scheduler::with_defaults();

    for _ in 0..3 {
        let (action, _) = counting_action();
        assert!(sched.register_callout(action, 10).is_ok());
    }

    let (overflow, _) = counting_action();
    let err = sched.register_callout(overflow, 10).unwrap_err();
    assert!(matches!(err, SchedError::CapacityExceeded { table: "callout", capacity: 3 }));
}

#[test]
fn callback_fires_every_period() {
    let mut sched: Scheduler<2, 2> = Scheduler::with_defaults();
    let (action, count) = counting_action();
    let handle = sched.register_callback(action, 5).unwrap();
    sched.set_callback_mode(handle, Mode::Enabled);

    let mut fire_ticks = Vec::new();
    for t in 1..=20u32 {
        let before = fires(&count);
        sched.tick();
        if fires(&count) > before {
            fire_ticks.push(t);
        }
    }

    // Period 5 enabled at tick 0: exactly 4 firings, at 5, 10, 15, 20.
    assert_eq!(fire_ticks, vec![5, 10, 15, 20]);
}

#[test]
fn disable_pauses_and_reenable_restarts_schedule() {
    let mut sched: Scheduler<2, 2> = Scheduler::with_defaults();
    let (action, count) = counting_action();
    let handle = sched.register_callback(action, 4).unwrap();
    sched.set_callback_mode(handle, Mode::Enabled);

    sched.advance(4);
    assert_eq!(fires(&count), 1);

    sched.set_callback_mode(handle, Mode::Disabled);
    sched.advance(12);
    assert_eq!(fires(&count), 1);

    // Re-enabled at tick 16: next fire is 20, relative to the re-enable
    // tick rather than the original registration schedule.
    sched.set_callback_mode(handle, Mode::Enabled);
    sched.advance(3);
    assert_eq!(fires(&count), 1);
    sched.advance(1);
    assert_eq!(fires(&count), 2);
}

#[test]
fn callout_fires_once_and_slot_is_reusable() {
    let mut sched: Scheduler<2, 1> = Scheduler::with_defaults();
    let (action, count) = counting_action();
    sched.register_callout(action, 3).unwrap();

    sched.advance(10);
    assert_eq!(fires(&count), 1);
    assert_eq!(sched.pending_callouts(), 0);

    // Capacity 1 was exhausted and must be free again after the firing.
    let (again, again_count) = counting_action();
    assert!(sched.register_callout(again, 2).is_ok());
    sched.advance(2);
    assert_eq!(fires(&again_count), 1);
}

#[test]
fn cancelled_callout_never_fires() {
    let mut sched: Scheduler<2, 1> = Scheduler::with_defaults();
    let (action, count) = counting_action();
    let handle = sched.register_callout(action, 5).unwrap();

    sched.advance(2);
    sched.cancel_callout(handle);
    sched.advance(20);

    assert_eq!(fires(&count), 0);
    // The slot freed by the cancel is reusable.
    let (again, _) = counting_action();
    assert!(sched.register_callout(again, 5).is_ok());
}

#[test]
fn callback_runs_before_callout_on_shared_tick() {
    let mut sched: Scheduler<2, 2> = Scheduler::with_defaults();
    let log = fire_log();

    let cb = sched.register_callback(tagging_action(&log, "callback"), 6).unwrap();
    sched.set_callback_mode(cb, Mode::Enabled);
    sched.register_callout(tagging_action(&log, "callout"), 6).unwrap();

    sched.advance(6);
    assert_eq!(logged(&log), vec!["callback", "callout"]);
}

#[test]
fn duplicate_callouts_occupy_independent_slots() {
    let mut sched: Scheduler<2, 4> = Scheduler::with_defaults();
    let log = fire_log();

    let first = sched.register_callout(tagging_action(&log, "dup"), 5).unwrap();
    let second = sched.register_callout(tagging_action(&log, "dup"), 5).unwrap();
    assert_ne!(first, second);
    assert_eq!(sched.pending_callouts(), 2);

    // Cancelling the first registration leaves the second pending.
    sched.cancel_callout(first);
    assert_eq!(sched.pending_callouts(), 1);

    sched.advance(5);
    assert_eq!(logged(&log), vec!["dup"]);
}

#[test]
fn metrics_reflect_scheduling_activity() {
    let mut sched: Scheduler<2, 2> = Scheduler::with_defaults();
    let (cb_action, _) = counting_action();
    let (co_action, _) = counting_action();
    let (cancelled, _) = counting_action();

    let cb = sched.register_callback(cb_action, 2).unwrap();
    sched.set_callback_mode(cb, Mode::Enabled);
    sched.register_callout(co_action, 4).unwrap();
    let doomed = sched.register_callout(cancelled, 9).unwrap();
    sched.cancel_callout(doomed);

    sched.advance(10);
    let snap = sched.metrics();
    assert_eq!(snap.ticks, 10);
    assert_eq!(snap.callbacks_fired, 5);
    assert_eq!(snap.callouts_fired, 1);
    assert_eq!(snap.callouts_cancelled, 1);
    assert_eq!(snap.callout_high_water, 2);
}
