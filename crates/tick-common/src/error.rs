use thiserror::Error;

/// Scheduler error types.
///
/// Registration is the only fallible operation: a table either claims a
/// slot immediately or fails immediately. Cancelling or toggling an entry
/// that does not exist is a silent no-op rather than an error, so there is
/// no `NotFound` variant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedError {
    /// Registration attempted while every slot in the table is occupied.
    /// Recoverable: the caller may retry once a slot frees up.
    #[error("{table} table full: all {capacity} slots in use")]
    CapacityExceeded {
        /// Which table rejected the registration.
        table: &'static str,
        /// Fixed capacity of that table.
        capacity: usize,
    },
}

/// Convenience type alias for scheduler operations.
pub type SchedResult<T> = Result<T, SchedError>;
