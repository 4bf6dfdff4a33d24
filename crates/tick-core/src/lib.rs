//! Cooperative tick scheduler core.
//!
//! A single periodic tick source drives two independent dispatch tables:
//!
//! - [`CallbackTable`] - fixed-capacity periodic callbacks, toggled on and
//!   off at runtime and rescheduled automatically after each firing.
//! - [`CalloutTable`] - fixed-capacity one-shot callouts tracked by an
//!   occupancy bitmap; a slot is vacated when its callout fires or is
//!   cancelled.
//!
//! The [`Scheduler`] owns both tables plus the [`Clock`] and is the single
//! context object the tick source drives: each tick advances the clock,
//! services callbacks, then services callouts, in that order.
//!
//! All mutation APIs take `&mut self`, so a half-written table entry can
//! never be observed from the tick context. Hosts that
//! drive ticks from a separate thread wrap the scheduler in a mutex and
//! use the lock scope as the critical section.

pub mod callback;
pub mod callout;
pub mod clock;
pub mod scheduler;

pub use callback::{CallbackHandle, CallbackTable, Mode};
pub use callout::{CalloutHandle, CalloutTable};
pub use clock::Clock;
pub use scheduler::{DefaultScheduler, Scheduler};

/// Default capacity of the callback table.
pub const MAX_CALLBACK_CNT: usize = 8;

/// Default capacity of the callout table.
pub const MAX_CALLOUT_CNT: usize = 16;

/// A registered action: no arguments, no return value, and it must run to
/// completion well inside one tick interval.
pub type Action = Box<dyn FnMut() + Send>;
