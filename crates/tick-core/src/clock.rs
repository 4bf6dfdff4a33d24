//! Monotonic tick clock.
//!
//! Holds the global tick counter and the timing multiplier derived from
//! the hardware clock speed. The counter is advanced exactly once per
//! hardware tick, before either dispatch table is serviced, and wraps on
//! overflow.

use tick_common::Tick;
use tracing::debug;

/// The scheduler's monotonic clock.
#[derive(Debug, Clone)]
pub struct Clock {
    now: Tick,
    timing_multiplier: u32,
}

impl Clock {
    /// Create a clock with the counter at zero.
    ///
    /// `clock_hz` is the hardware clock speed in cycles per second. The
    /// derived timing multiplier is the count the external timer setup
    /// needs to program a 1 ms tick; this core only computes and exposes
    /// it.
    #[must_use]
    pub fn new(clock_hz: u64) -> Self {
        Self::starting_at(clock_hz, Tick::ZERO)
    }

    /// Create a clock with the counter seeded at `origin`.
    ///
    /// Seeding near `u32::MAX` exercises counter wraparound in a handful
    /// of ticks.
    #[must_use]
    pub fn starting_at(clock_hz: u64, origin: Tick) -> Self {
        let timing_multiplier = u32::try_from(clock_hz / 1_000_000)
            .unwrap_or(u32::MAX)
            .saturating_mul(2);
        debug!(clock_hz, timing_multiplier, origin = origin.raw(), "clock initialized");
        Self {
            now: origin,
            timing_multiplier,
        }
    }

    /// Current counter value. No side effects.
    #[must_use]
    pub fn now(&self) -> Tick {
        self.now
    }

    /// Timing multiplier for the external hardware timer configuration.
    #[must_use]
    pub fn timing_multiplier(&self) -> u32 {
        self.timing_multiplier
    }

    /// Advance the counter by one tick, wrapping on overflow.
    ///
    /// Must be called exactly once per hardware tick, before any table
    /// service. Returns the new counter value.
    pub fn tick(&mut self) -> Tick {
        self.now = self.now.advance();
        self.now
    }
}
