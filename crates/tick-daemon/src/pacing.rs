//! Tick-source pacing.
//!
//! On an embedded target ticks come from a timer interrupt; on a host
//! the daemon paces a loop against absolute deadlines instead, invoking
//! the dispatcher once per interval with no gaps and no
//! double-invocation. Uses `clock_nanosleep` on Linux for low-jitter
//! waits.

use std::time::{Duration, Instant};

/// Paces the tick loop to one invocation per interval.
#[derive(Debug)]
pub struct TickPacer {
    interval: Duration,
    next_deadline: Instant,
}

impl TickPacer {
    /// Create a pacer whose first deadline is one interval from now.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_deadline: Instant::now() + interval,
        }
    }

    /// The configured tick interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until the next tick deadline, then advance it one interval.
    ///
    /// Deadlines are absolute, so a slow iteration shortens the following
    /// wait instead of letting the schedule drift.
    pub fn wait(&mut self) {
        wait_until(self.next_deadline);
        self.next_deadline += self.interval;
    }
}

/// Wait until the specified deadline using high-precision sleep.
#[cfg(target_os = "linux")]
fn wait_until(deadline: Instant) {
    let now = Instant::now();
    if deadline <= now {
        return; // Already past deadline
    }

    let duration = deadline - now;
    let ts = libc::timespec {
        tv_sec: duration.as_secs() as libc::time_t,
        tv_nsec: duration.subsec_nanos() as libc::c_long,
    };

    // SAFETY: clock_nanosleep is safe with valid parameters
    #[allow(unsafe_code)]
    unsafe {
        libc::clock_nanosleep(libc::CLOCK_MONOTONIC, 0, &ts, std::ptr::null_mut());
    }
}

#[cfg(not(target_os = "linux"))]
fn wait_until(deadline: Instant) {
    let now = Instant::now();
    if deadline > now {
        std::thread::sleep(deadline - now);
    }
}
