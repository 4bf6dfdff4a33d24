//! One-shot callout table.
//!
//! A fixed-capacity table of one-shot actions tracked by an occupancy
//! bitmap: bit `i` set means slot `i` holds a live pending callout.
//! Registration claims the lowest-index free bit; firing or cancelling
//! clears it and the slot becomes reusable. Each slot carries a
//! generation counter so a handle left over from a previous tenant of the
//! slot is recognized as stale and ignored.

use crate::Action;
use tick_common::{SchedError, SchedResult, Tick};
use tracing::{debug, trace};

/// Opaque handle to a pending callout.
///
/// Becomes stale once the callout fires or is cancelled; using a stale
/// handle is a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalloutHandle {
    slot: usize,
    generation: u32,
}

/// One pending one-shot callout.
struct CalloutEntry {
    action: Action,
    /// The tick at which this callout fires.
    run_time: Tick,
}

/// Fixed-capacity table of one-shot callouts.
///
/// `CAP` must fit in the `u32` occupancy map.
pub struct CalloutTable<const CAP: usize> {
    slots: [Option<CalloutEntry>; CAP],
    /// Occupancy map, the source of truth: bit i set iff slots[i] is Some.
    map: u32,
    /// Per-slot generation, bumped each time the slot is vacated.
    generations: [u32; CAP],
    ticks_per_ms: u32,
}

impl<const CAP: usize> CalloutTable<CAP> {
    const CAP_FITS_MAP: () = assert!(CAP <= 32, "callout capacity is limited by the u32 occupancy map");

    /// Create an empty table.
    ///
    /// `ticks_per_ms` scales registration delays (given in milliseconds)
    /// into ticks.
    #[must_use]
    pub fn new(ticks_per_ms: u32) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAP_FITS_MAP;
        Self {
            slots: std::array::from_fn(|_| None),
            map: 0,
            generations: [0; CAP],
            ticks_per_ms,
        }
    }

    /// Number of pending callouts (population count of the occupancy map).
    #[must_use]
    pub fn pending(&self) -> usize {
        self.map.count_ones() as usize
    }

    /// Whether no callouts are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map == 0
    }

    /// Fixed capacity of the table.
    #[must_use]
    pub fn capacity(&self) -> usize {
        CAP
    }

    /// Register a one-shot callout firing `delay_ms` milliseconds from
    /// `now`.
    ///
    /// Claims the lowest-index free slot. Registering the same underlying
    /// action more than once is allowed; each registration occupies its
    /// own slot and gets its own handle.
    ///
    /// # Errors
    ///
    /// Returns [`SchedError::CapacityExceeded`] when every slot is
    /// occupied.
    pub fn register(
        &mut self,
        action: Action,
        delay_ms: u32,
        now: Tick,
    ) -> SchedResult<CalloutHandle> {
        if self.pending() == CAP {
            return Err(SchedError::CapacityExceeded {
                table: "callout",
                capacity: CAP,
            });
        }

        // First-fit: the lowest clear bit is the lowest-index free slot.
        let slot = self.map.trailing_ones() as usize;
        let run_time = now.after(delay_ms.saturating_mul(self.ticks_per_ms));
        self.map |= 1u32 << slot;
        self.slots[slot] = Some(CalloutEntry { action, run_time });
        debug!(slot, run_time = run_time.raw(), "callout registered");
        Ok(CalloutHandle {
            slot,
            generation: self.generations[slot],
        })
    }

    /// Cancel a pending callout, freeing its slot immediately.
    ///
    /// Works whether or not the run time has passed. A stale or unknown
    /// handle is silently ignored; cancellation cannot reach a callout
    /// that has already fired.
    pub fn cancel(&mut self, handle: CalloutHandle) {
        if handle.slot >= CAP {
            return;
        }
        let bit = 1u32 << handle.slot;
        if self.map & bit == 0 || self.generations[handle.slot] != handle.generation {
            return;
        }
        self.vacate(handle.slot);
        debug!(slot = handle.slot, "callout cancelled");
    }

    /// Fire every pending callout whose run time equals `now`.
    ///
    /// A fired callout's slot is vacated before its action runs; the entry
    /// never survives its own firing. The scan stops early once as many
    /// callouts have fired as were pending at entry - a bound on work, not
    /// on which entries are considered. Returns the number fired.
    pub fn service(&mut self, now: Tick) -> usize {
        let mut remaining = self.pending();
        if remaining == 0 {
            return 0;
        }

        let mut fired = 0;
        for slot in 0..CAP {
            let bit = 1u32 << slot;
            if self.map & bit == 0 {
                continue;
            }
            let due = self.slots[slot]
                .as_ref()
                .is_some_and(|entry| entry.run_time == now);
            if due {
                let Some(mut entry) = self.vacate(slot) else { continue };
                (entry.action)();
                trace!(slot, tick = now.raw(), "callout fired");
                fired += 1;
                remaining -= 1;
                if remaining == 0 {
                    break;
                }
            }
        }
        fired
    }

    /// Clear a slot's occupancy bit, bump its generation, and take the
    /// entry out.
    fn vacate(&mut self, slot: usize) -> Option<CalloutEntry> {
        self.map &= !(1u32 << slot);
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.slots[slot].take()
    }
}

impl<const CAP: usize> std::fmt::Debug for CalloutTable<CAP> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalloutTable")
            .field("capacity", &CAP)
            .field("pending", &self.pending())
            .field("map", &format_args!("{:#b}", self.map))
            .finish_non_exhaustive()
    }
}
