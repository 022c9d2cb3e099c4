//! Default capacity for the process-wide cache
//!
//! The value is read once, when [`crate::cache()`] first builds the shared
//! instance. Later changes only matter to a cache that has not been built yet.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::error::{Error, Result};

/// Capacity used when nothing was configured
pub const DEFAULT_CAPACITY: usize = 1024;

/// Exclusive lower bound for a configured capacity
pub const MIN_CAPACITY: usize = 128;

/// Exclusive upper bound for a configured capacity
pub const MAX_CAPACITY: usize = 1 << 20;

static CONFIGURED_CAPACITY: AtomicUsize = AtomicUsize::new(DEFAULT_CAPACITY);

/// Serializes tests that touch the process-wide configuration
#[cfg(test)]
pub(crate) static TEST_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

/// Check whether `capacity` may be configured as the default
pub fn is_valid_capacity(capacity: usize) -> bool {
    capacity > MIN_CAPACITY && capacity < MAX_CAPACITY
}

/// Set the default capacity, reporting why a value was refused
pub fn try_configure_capacity(capacity: usize) -> Result<()> {
    if !is_valid_capacity(capacity) {
        debug!(capacity, "Rejected default cache capacity");
        return Err(Error::InvalidCapacity(capacity));
    }

    CONFIGURED_CAPACITY.store(capacity, Ordering::Release);
    debug!(capacity, "Configured default cache capacity");
    Ok(())
}

/// Set the default capacity
///
/// Returns `false` and leaves the current value untouched unless
/// `128 < capacity < 2^20`.
pub fn configure_capacity(capacity: usize) -> bool {
    try_configure_capacity(capacity).is_ok()
}

/// Current default capacity
pub fn configured_capacity() -> usize {
    CONFIGURED_CAPACITY.load(Ordering::Acquire)
}
