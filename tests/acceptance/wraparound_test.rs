//! Counter wraparound behavior.
//!
//! The clock is seeded near `u32::MAX` so that the wrap happens within a
//! few ticks. Because due-ness is an equality comparison on wrapping
//! ticks, entries whose due times land past the wrap must still fire at
//! the correct wrapped counter value.

use crate::acceptance::common::{counting_action, fires};
use tick_common::{SchedConfig, Tick};
use tick_core::{Mode, Scheduler};

#[test]
fn callout_fires_across_the_wrap() {
    let config = SchedConfig::default();
    let mut sched: Scheduler<2, 2> = Scheduler::starting_at(&config, Tick::new(u32::MAX - 2));

    let (action, count) = counting_action();
    // Due at (MAX - 2) + 5, which wraps to tick 2.
    sched.register_callout(action, 5).unwrap();

    sched.advance(4);
    assert_eq!(fires(&count), 0);
    assert_eq!(sched.now(), Tick::new(1));

    sched.advance(1);
    assert_eq!(sched.now(), Tick::new(2));
    assert_eq!(fires(&count), 1);
}

#[test]
fn callback_keeps_its_period_across_the_wrap() {
    let config = SchedConfig::default();
    let mut sched: Scheduler<2, 2> = Scheduler::starting_at(&config, Tick::new(u32::MAX - 7));

    let (action, count) = counting_action();
    let handle = sched.register_callback(action, 5).unwrap();
    sched.set_callback_mode(handle, Mode::Enabled);

    // Fires at MAX - 2, then at the wrapped tick 2, then at 7.
    let mut wrapped_fires = Vec::new();
    for _ in 0..15 {
        let before = fires(&count);
        let now = sched.tick();
        if fires(&count) > before {
            wrapped_fires.push(now);
        }
    }

    assert_eq!(
        wrapped_fires,
        vec![Tick::new(u32::MAX - 2), Tick::new(2), Tick::new(7)]
    );
}

#[test]
fn clock_itself_wraps_to_zero() {
    let config = SchedConfig::default();
    let mut sched: Scheduler<2, 2> = Scheduler::starting_at(&config, Tick::new(u32::MAX));

    assert_eq!(sched.tick(), Tick::ZERO);
    assert_eq!(sched.tick(), Tick::new(1));
}
