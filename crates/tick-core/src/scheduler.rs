//! Tick dispatcher.
//!
//! [`Scheduler`] is the single context object owning the clock, both
//! dispatch tables, and the service metrics. The external tick source calls
//! [`Scheduler::tick`] exactly once per tick interval; everything else is
//! driven from normal context through the registration wrappers.

use crate::callback::{CallbackHandle, CallbackTable, Mode};
use crate::callout::{CalloutHandle, CalloutTable};
use crate::clock::Clock;
use crate::{Action, MAX_CALLBACK_CNT, MAX_CALLOUT_CNT};
use tick_common::{MetricsSnapshot, SchedConfig, SchedResult, ServiceMetrics, Tick};
use tracing::trace;

/// Scheduler with the default table capacities.
pub type DefaultScheduler = Scheduler<MAX_CALLBACK_CNT, MAX_CALLOUT_CNT>;

/// Cooperative tick scheduler.
///
/// `CBS` and `COS` are the compile-time capacities of the callback and
/// callout tables.
#[derive(Debug)]
pub struct Scheduler<const CBS: usize = MAX_CALLBACK_CNT, const COS: usize = MAX_CALLOUT_CNT> {
    clock: Clock,
    callbacks: CallbackTable<CBS>,
    callouts: CalloutTable<COS>,
    metrics: ServiceMetrics,
}

impl<const CBS: usize, const COS: usize> Scheduler<CBS, COS> {
    /// Create a scheduler from configuration, with the clock at zero.
    #[must_use]
    pub fn new(config: &SchedConfig) -> Self {
        Self::starting_at(config, Tick::ZERO)
    }

    /// Create a scheduler with the clock seeded at `origin`.
    ///
    /// Seeding near `u32::MAX` brings counter wraparound within reach of a
    /// short test run.
    #[must_use]
    pub fn starting_at(config: &SchedConfig, origin: Tick) -> Self {
        Self {
            clock: Clock::starting_at(config.clock_hz, origin),
            callbacks: CallbackTable::new(config.ticks_per_ms),
            callouts: CalloutTable::new(config.ticks_per_ms),
            metrics: ServiceMetrics::new(),
        }
    }

    /// Create a scheduler with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(&SchedConfig::default())
    }

    /// Current tick.
    #[must_use]
    pub fn now(&self) -> Tick {
        self.clock.now()
    }

    /// Timing multiplier for the external hardware timer configuration.
    #[must_use]
    pub fn timing_multiplier(&self) -> u32 {
        self.clock.timing_multiplier()
    }

    /// Service one tick.
    ///
    /// This is the tick-context entry point. The order is a contract:
    /// advance the clock, service callbacks, then service callouts, so an
    /// action due in both tables on the same tick always observes the
    /// callback run first. Returns the new tick.
    pub fn tick(&mut self) -> Tick {
        let now = self.clock.tick();
        let callbacks_fired = self.callbacks.service(now);
        let callouts_fired = self.callouts.service(now);
        self.metrics.record_tick(callbacks_fired, callouts_fired);
        if callbacks_fired + callouts_fired > 0 {
            trace!(tick = now.raw(), callbacks_fired, callouts_fired, "tick serviced");
        }
        now
    }

    /// Service `ticks` consecutive ticks.
    ///
    /// Simulation and test helper; hardware tick sources call
    /// [`tick`](Self::tick) directly.
    pub fn advance(&mut self, ticks: u32) -> Tick {
        for _ in 0..ticks {
            self.tick();
        }
        self.now()
    }

    /// Register a periodic callback, initially disabled.
    ///
    /// # Errors
    ///
    /// Returns [`SchedError::CapacityExceeded`](tick_common::SchedError)
    /// when the callback table is full.
    pub fn register_callback(&mut self, action: Action, period_ms: u32) -> SchedResult<CallbackHandle> {
        let handle = self.callbacks.register(action, period_ms, self.clock.now())?;
        self.metrics.observe_callback_count(self.callbacks.len());
        Ok(handle)
    }

    /// Enable or disable a registered callback.
    ///
    /// Enabling restarts the callback's schedule relative to the current
    /// tick. Unknown handles are silently ignored.
    pub fn set_callback_mode(&mut self, handle: CallbackHandle, mode: Mode) {
        self.callbacks.set_mode(handle, mode, self.clock.now());
    }

    /// Register a one-shot callout firing `delay_ms` milliseconds from
    /// now.
    ///
    /// # Errors
    ///
    /// Returns [`SchedError::CapacityExceeded`](tick_common::SchedError)
    /// when the callout table is full.
    pub fn register_callout(&mut self, action: Action, delay_ms: u32) -> SchedResult<CalloutHandle> {
        let handle = self.callouts.register(action, delay_ms, self.clock.now())?;
        self.metrics.observe_callout_count(self.callouts.pending());
        Ok(handle)
    }

    /// Cancel a pending callout. Stale handles are silently ignored.
    pub fn cancel_callout(&mut self, handle: CalloutHandle) {
        let before = self.callouts.pending();
        self.callouts.cancel(handle);
        if self.callouts.pending() < before {
            self.metrics.record_cancel();
        }
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Number of pending callouts.
    #[must_use]
    pub fn pending_callouts(&self) -> usize {
        self.callouts.pending()
    }

    /// Snapshot of the service metrics.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl Default for DefaultScheduler {
    fn default() -> Self {
        Self::with_defaults()
    }
}
