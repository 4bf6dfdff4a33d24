//! Wrapping tick counter type.
//!
//! One tick is one invocation of the hardware timer interrupt, nominally
//! 1 ms. The counter wraps on overflow: every due-time check in the
//! scheduler is an exact-equality comparison, so wraparound is handled
//! for free as long as nothing ever does an ordered "elapsed" comparison.
//! `Tick` therefore implements `PartialEq`/`Eq` but deliberately not `Ord`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the wrapping tick counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tick(u32);

impl Tick {
    /// Tick zero, the counter value at power-on.
    pub const ZERO: Tick = Tick(0);

    /// Construct a tick from a raw counter value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Tick(raw)
    }

    /// Raw counter value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The next tick, wrapping at the counter maximum.
    #[must_use]
    pub const fn advance(self) -> Tick {
        Tick(self.0.wrapping_add(1))
    }

    /// The tick `ticks` intervals after this one, wrapping on overflow.
    #[must_use]
    pub const fn after(self, ticks: u32) -> Tick {
        Tick(self.0.wrapping_add(ticks))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
