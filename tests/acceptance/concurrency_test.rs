//! Mutex-shared scheduler driven from a separate tick thread.
//!
//! Mirrors the daemon's arrangement: the tick thread locks the scheduler
//! once per tick, and normal-context mutation happens under the same
//! lock, whose scope is the critical section.

use crate::acceptance::common::{counting_action, fires};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tick_core::{DefaultScheduler, Mode};

#[test]
fn tick_thread_and_control_path_share_the_scheduler() {
    let mut sched = DefaultScheduler::with_defaults();

    let (heartbeat, heartbeat_count) = counting_action();
    let handle = sched.register_callback(heartbeat, 10).unwrap();
    sched.set_callback_mode(handle, Mode::Enabled);

    let (oneshot, oneshot_count) = counting_action();
    sched.register_callout(oneshot, 150).unwrap();

    let shared = Arc::new(Mutex::new(sched));

    // Tick thread: 200 ticks, each serviced under the lock.
    let ticker = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            for _ in 0..200 {
                shared.lock().unwrap().tick();
                thread::yield_now();
            }
        })
    };

    // Control path: poke at the tables concurrently with the ticking.
    for _ in 0..20 {
        {
            let mut sched = shared.lock().unwrap();
            let (extra, _) = counting_action();
            // Far enough out never to fire during this test.
            if let Ok(h) = sched.register_callout(extra, 100_000) {
                sched.cancel_callout(h);
            }
        }
        thread::sleep(Duration::from_millis(1));
    }

    ticker.join().unwrap();

    let sched = shared.lock().unwrap();
    let snap = sched.metrics();
    assert_eq!(snap.ticks, 200);
    assert_eq!(fires(&heartbeat_count), 20);
    assert_eq!(fires(&oneshot_count), 1);
    assert_eq!(snap.callbacks_fired, 20);
    assert_eq!(snap.callouts_fired, 1);
    assert_eq!(sched.pending_callouts(), 0);
}
