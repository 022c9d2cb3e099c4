//! Write barrier: a monitor ordering readers after in-flight writers
//!
//! A writer is counted as in flight from the moment it holds the lock until
//! its guard is dropped. Readers take the same lock and then wait on the
//! condition variable until no writer is in flight. Marking happens inside
//! the critical section, so a reader can never observe a writer that is
//! counted but not yet holding the lock.
//!
//! A writer that keeps the lock for its whole write leaves nothing for a
//! reader to wait on; the condvar wait only parks readers while a writer
//! has stepped off the lock with [`WriteGuard::unlocked`].

use std::ops::{Deref, DerefMut};

use parking_lot::{Condvar, Mutex, MutexGuard};

struct Monitored<T> {
    value: T,
    writers: usize,
}

/// Mutex plus condition variable guarding a single value
pub struct WriteBarrier<T> {
    state: Mutex<Monitored<T>>,
    settled: Condvar,
}

impl<T> WriteBarrier<T> {
    /// Wrap `value` in a new barrier
    pub fn new(value: T) -> Self {
        Self {
            state: Mutex::new(Monitored { value, writers: 0 }),
            settled: Condvar::new(),
        }
    }

    /// Begin a write: lock and mark a writer in flight
    ///
    /// The mark is cleared and waiters are notified when the guard drops.
    pub fn begin_write(&self) -> WriteGuard<'_, T> {
        let mut guard = self.state.lock();
        guard.writers += 1;
        WriteGuard {
            barrier: self,
            guard,
        }
    }

    /// Lock once no writer is in flight
    pub fn settled(&self) -> SettledGuard<'_, T> {
        let mut guard = self.state.lock();
        self.settled.wait_while(&mut guard, |state| state.writers > 0);
        SettledGuard {
            barrier: self,
            guard,
        }
    }

    /// Number of writers currently in flight
    pub fn active_writers(&self) -> usize {
        self.state.lock().writers
    }

    /// Consume the barrier and return the guarded value
    pub fn into_inner(self) -> T {
        self.state.into_inner().value
    }
}

/// Exclusive access for a writer; ends the write on drop
pub struct WriteGuard<'a, T> {
    barrier: &'a WriteBarrier<T>,
    guard: MutexGuard<'a, Monitored<T>>,
}

impl<T> WriteGuard<'_, T> {
    /// Writers in flight, this one included
    pub fn active_writers(&self) -> usize {
        self.guard.writers
    }

    /// Release the lock while running `f`, staying marked in flight
    ///
    /// Readers calling [`WriteBarrier::settled`] in the meantime park until
    /// this guard is dropped.
    pub fn unlocked<U>(&mut self, f: impl FnOnce() -> U) -> U {
        MutexGuard::unlocked(&mut self.guard, f)
    }
}

impl<T> Deref for WriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard.value
    }
}

impl<T> DerefMut for WriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard.value
    }
}

impl<T> Drop for WriteGuard<'_, T> {
    fn drop(&mut self) {
        self.guard.writers -= 1;
        self.barrier.settled.notify_all();
    }
}

/// Exclusive access for a reader that waited out all writers
pub struct SettledGuard<'a, T> {
    barrier: &'a WriteBarrier<T>,
    guard: MutexGuard<'a, Monitored<T>>,
}

impl<T> Deref for SettledGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard.value
    }
}

impl<T> DerefMut for SettledGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard.value
    }
}

impl<T> Drop for SettledGuard<'_, T> {
    fn drop(&mut self) {
        self.barrier.settled.notify_all();
    }
}
