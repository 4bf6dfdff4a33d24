//! Service metrics for the tick dispatcher.
//!
//! Plain saturating counters updated from the tick context, so recording
//! must stay allocation-free. A serializable snapshot is taken from normal
//! context for reporting.

use serde::Serialize;

/// Counters maintained by the dispatcher across its lifetime.
#[derive(Debug, Default)]
pub struct ServiceMetrics {
    /// Ticks serviced by the dispatcher.
    ticks: u64,
    /// Total callback firings.
    callbacks_fired: u64,
    /// Total callout firings.
    callouts_fired: u64,
    /// Total callouts cancelled before firing.
    callouts_cancelled: u64,
    /// Highest number of simultaneously registered callbacks.
    callback_high_water: usize,
    /// Highest number of simultaneously pending callouts.
    callout_high_water: usize,
}

impl ServiceMetrics {
    /// Create a zeroed metrics collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one serviced tick and the number of actions it fired.
    pub fn record_tick(&mut self, callbacks_fired: usize, callouts_fired: usize) {
        self.ticks += 1;
        self.callbacks_fired += callbacks_fired as u64;
        self.callouts_fired += callouts_fired as u64;
    }

    /// Record a callout cancellation.
    pub fn record_cancel(&mut self) {
        self.callouts_cancelled += 1;
    }

    /// Update the callback occupancy high-water mark.
    pub fn observe_callback_count(&mut self, registered: usize) {
        self.callback_high_water = self.callback_high_water.max(registered);
    }

    /// Update the callout occupancy high-water mark.
    pub fn observe_callout_count(&mut self, pending: usize) {
        self.callout_high_water = self.callout_high_water.max(pending);
    }

    /// Ticks serviced so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total callback firings so far.
    #[must_use]
    pub fn callbacks_fired(&self) -> u64 {
        self.callbacks_fired
    }

    /// Total callout firings so far.
    #[must_use]
    pub fn callouts_fired(&self) -> u64 {
        self.callouts_fired
    }

    /// Get a snapshot of current metrics.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks,
            callbacks_fired: self.callbacks_fired,
            callouts_fired: self.callouts_fired,
            callouts_cancelled: self.callouts_cancelled,
            callback_high_water: self.callback_high_water,
            callout_high_water: self.callout_high_water,
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Immutable snapshot of metrics for reporting.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricsSnapshot {
    /// Ticks serviced.
    pub ticks: u64,
    /// Total callback firings.
    pub callbacks_fired: u64,
    /// Total callout firings.
    pub callouts_fired: u64,
    /// Total callouts cancelled before firing.
    pub callouts_cancelled: u64,
    /// Highest simultaneous callback registration count.
    pub callback_high_water: usize,
    /// Highest simultaneous pending callout count.
    pub callout_high_water: usize,
}
