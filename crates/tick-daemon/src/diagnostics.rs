//! Diagnostics reporting for the tick daemon.
//!
//! Collects daemon-level facts alongside the scheduler's own service
//! metrics and renders them as a JSON report for external monitoring.

use serde::Serialize;
use std::time::Instant;
use tick_common::MetricsSnapshot;

/// Daemon-level diagnostics collector.
#[derive(Debug)]
pub struct Diagnostics {
    start_time: Instant,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Create a collector anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Uptime in whole seconds.
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Build a report from the current scheduler state.
    #[must_use]
    pub fn report(&self, current_tick: u32, metrics: MetricsSnapshot) -> Report {
        Report {
            uptime_secs: self.uptime_secs(),
            current_tick,
            metrics,
        }
    }
}

/// A point-in-time diagnostics report.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Report {
    /// Seconds since daemon start.
    pub uptime_secs: u64,
    /// Current value of the tick counter.
    pub current_tick: u32,
    /// Scheduler service metrics.
    pub metrics: MetricsSnapshot,
}

impl Report {
    /// Render the report as a single-line JSON string.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}
