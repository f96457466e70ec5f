// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A busy-wait mutual-exclusion primitive with a trivial initial state.

use std::sync::atomic::{AtomicBool, Ordering};

/// A busy-wait lock whose unlocked state is all-zeroes.
///
/// Because the state is a single `AtomicBool` and [`SpinLock::new`] is
/// `const`, a `SpinLock` can live directly inside a `static`, unlike a
/// `std::sync::Mutex`, which must not be a bare global field in this layer
/// (see the [`sync`](crate::sync) module docs). It is intended to guard
/// *slot creation* only; anything guarding actual data contents should be a
/// real `Mutex` created behind a [`LazySlot`](crate::sync::LazySlot).
///
/// There is no fairness guarantee and no poisoning. Waiters yield the
/// processor between acquisition attempts rather than spinning at full cost.
#[derive(Debug, Default)]
pub struct SpinLock {
    locked: AtomicBool,
}

/// RAII guard returned by [`SpinLock::lock`]. Releases the lock on drop, so
/// an unlock without a matching lock is unrepresentable.
#[derive(Debug)]
pub struct SpinGuard<'a> {
    lock: &'a SpinLock,
}

impl SpinLock {
    /// Creates an unlocked `SpinLock`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    /// Blocks the calling thread until the lock is acquired.
    ///
    /// Acquisition is a compare-and-swap with acquire ordering; every failed
    /// attempt yields the thread. Callers should assume a bounded but
    /// non-deterministic wait, not scheduler-level blocking.
    ///
    /// ## Returns
    /// A [`SpinGuard`] that releases the lock when dropped.
    pub fn lock(&self) -> SpinGuard<'_> {
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            std::thread::yield_now();
        }
        SpinGuard { lock: self }
    }
}

impl Drop for SpinGuard<'_> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn lock_is_released_on_guard_drop() {
        let lock = SpinLock::new();
        drop(lock.lock());
        // A second acquisition on the same thread must not deadlock.
        drop(lock.lock());
    }

    #[test]
    fn mutual_exclusion_across_threads() {
        // Track how many threads are inside the critical section at once.
        // If two holders ever overlap, `inside` exceeds 1.
        let lock = SpinLock::new();
        let inside = AtomicUsize::new(0);
        let overlaps = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..1_000 {
                        let _guard = lock.lock();
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        if now > 1 {
                            overlaps.fetch_add(1, Ordering::SeqCst);
                        }
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    }
}
