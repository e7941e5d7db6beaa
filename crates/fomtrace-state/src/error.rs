use thiserror::Error;

/// Errors from layout bookkeeping.
///
/// Capacity errors are expected under load and callers treat them as
/// warnings; the rest indicate a misconfiguration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("invalid time axis: {0}")]
    InvalidAxis(String),

    #[error("locality {group} has all {capacity} lanes taken")]
    CapacityExceeded { group: usize, capacity: usize },

    #[error("no I/O lane out of {capacity} is free for the interval")]
    IoLanesExhausted { capacity: usize },

    #[error("locality {group} out of range ({groups} configured)")]
    UnknownGroup { group: usize, groups: usize },
}
