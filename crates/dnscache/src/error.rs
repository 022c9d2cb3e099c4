//! Error types for dnscache

use std::fmt;

use crate::config::{MAX_CAPACITY, MIN_CAPACITY};

/// Result type alias for dnscache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Default capacity outside the accepted range
    InvalidCapacity(usize),

    /// Cache constructed with room for nothing
    ZeroCapacity,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(size) => write!(
                f,
                "Invalid capacity: {} (must be above {} and below {})",
                size, MIN_CAPACITY, MAX_CAPACITY
            ),
            Error::ZeroCapacity => write!(f, "Capacity must be greater than 0"),
        }
    }
}

impl std::error::Error for Error {}
