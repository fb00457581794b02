use thiserror::Error;

/// Errors reported by table construction, probing and mutation.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// The requested capacity is below the minimum of three slots.
    #[error("capacity must be at least {min}, got {0}", min = crate::config::MIN_CAPACITY)]
    InvalidCapacity(usize),

    /// A load-factor threshold is NaN, or the maximum is not positive.
    #[error("invalid load factor {0}")]
    InvalidLoadFactor(f64),

    /// A probe attempt lies outside `0..=capacity`.
    #[error("probe attempt {attempt} is out of range for capacity {capacity}")]
    AttemptOutOfRange {
        /// The rejected attempt count.
        attempt: usize,
        /// The capacity the attempt was checked against.
        capacity: usize,
    },

    /// A probe function was handed a zero capacity or a zero step prime.
    #[error("probe modulus must be non-zero")]
    InvalidProbeModulus,

    /// Every slot of the table holds a live element.
    #[error("table is full")]
    Full,

    /// Removal was attempted on a table with no live elements.
    #[error("table is empty")]
    Empty,
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
