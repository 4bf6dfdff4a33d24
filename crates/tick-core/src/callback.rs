//! Periodic callback table.
//!
//! A fixed-capacity registry of periodic actions. Entries are created at
//! registration and never destroyed; they are toggled between `Enabled`
//! and `Disabled` instead. An enabled entry fires when the clock reaches
//! its next run time exactly, then reschedules itself one period ahead.

use crate::Action;
use tick_common::{SchedError, SchedResult, Tick};
use tracing::{debug, trace};

/// Enable state of a registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The callback fires each time its next run time comes due.
    Enabled,
    /// The callback is skipped during service.
    Disabled,
}

/// Opaque handle to a registered callback.
///
/// Callbacks are never unregistered, so the handle stays valid for the
/// table's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackHandle(usize);

/// One registered periodic callback.
struct CallbackEntry {
    action: Action,
    enabled: bool,
    /// Period in ticks, fixed at registration.
    period: u32,
    /// The next tick at which this entry fires, while enabled.
    next_run: Tick,
}

/// Fixed-capacity table of periodic callbacks.
pub struct CallbackTable<const CAP: usize> {
    entries: [Option<CallbackEntry>; CAP],
    registered: usize,
    ticks_per_ms: u32,
}

impl<const CAP: usize> CallbackTable<CAP> {
    /// Create an empty table.
    ///
    /// `ticks_per_ms` scales registration periods (given in milliseconds)
    /// into ticks.
    #[must_use]
    pub fn new(ticks_per_ms: u32) -> Self {
        Self {
            entries: std::array::from_fn(|_| None),
            registered: 0,
            ticks_per_ms,
        }
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registered
    }

    /// Whether no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registered == 0
    }

    /// Fixed capacity of the table.
    #[must_use]
    pub fn capacity(&self) -> usize {
        CAP
    }

    /// Register a periodic callback.
    ///
    /// The entry starts `Disabled`; callers must enable it explicitly with
    /// [`set_mode`](Self::set_mode). `period_ms` must be at least 1 ms.
    /// An initial next run time is computed immediately, but it is
    /// recomputed relative to the enable tick when the entry is first
    /// enabled.
    ///
    /// # Errors
    ///
    /// Returns [`SchedError::CapacityExceeded`] when the table is full.
    pub fn register(
        &mut self,
        action: Action,
        period_ms: u32,
        now: Tick,
    ) -> SchedResult<CallbackHandle> {
        debug_assert!(period_ms >= 1, "callback period must be at least 1 ms");
        if self.registered == CAP {
            return Err(SchedError::CapacityExceeded {
                table: "callback",
                capacity: CAP,
            });
        }

        let period = period_ms.saturating_mul(self.ticks_per_ms);
        let slot = self.registered;
        self.entries[slot] = Some(CallbackEntry {
            action,
            enabled: false,
            period,
            next_run: now.after(period),
        });
        self.registered += 1;

        debug!(slot, period_ticks = period, "callback registered");
        Ok(CallbackHandle(slot))
    }

    /// Enable or disable a callback.
    ///
    /// Enabling reschedules the entry relative to `now`, so the first fire
    /// after enabling lands exactly one period later. Disabling leaves the
    /// stored schedule untouched. An unknown handle is silently ignored.
    pub fn set_mode(&mut self, handle: CallbackHandle, mode: Mode, now: Tick) {
        let Some(entry) = self.entries.get_mut(handle.0).and_then(Option::as_mut) else {
            return;
        };
        entry.enabled = mode == Mode::Enabled;
        if entry.enabled {
            entry.next_run = now.after(entry.period);
        }
        debug!(slot = handle.0, ?mode, "callback mode changed");
    }

    /// Current mode of a callback, or `None` for an unknown handle.
    #[must_use]
    pub fn mode(&self, handle: CallbackHandle) -> Option<Mode> {
        let entry = self.entries.get(handle.0).and_then(Option::as_ref)?;
        Some(if entry.enabled { Mode::Enabled } else { Mode::Disabled })
    }

    /// Fire every enabled callback whose next run time equals `now`.
    ///
    /// Each fired entry is rescheduled one period ahead before its action
    /// runs. The scan stops early once as many entries have fired as are
    /// registered; the bound is the registered count, so a due entry can
    /// never be skipped. Returns the number of callbacks fired.
    ///
    /// Must not be re-entered; actions run to completion before the next
    /// tick is serviced.
    pub fn service(&mut self, now: Tick) -> usize {
        let mut remaining = self.registered;
        if remaining == 0 {
            return 0;
        }

        let mut fired = 0;
        for (slot, entry) in self.entries.iter_mut().enumerate() {
            let Some(entry) = entry else { continue };
            if entry.enabled && entry.next_run == now {
                entry.next_run = now.after(entry.period);
                (entry.action)();
                trace!(slot, tick = now.raw(), "callback fired");
                fired += 1;
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
            }
        }
        fired
    }
}

impl<const CAP: usize> std::fmt::Debug for CallbackTable<CAP> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackTable")
            .field("capacity", &CAP)
            .field("registered", &self.registered)
            .finish_non_exhaustive()
    }
}
