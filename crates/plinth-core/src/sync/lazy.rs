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

//! A lazily-populated singleton slot with double-checked initialization.

use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

use crate::sync::SpinLock;

/// An owning slot that heap-allocates its value on first access.
///
/// The slot starts empty (a null pointer) and is populated at most once per
/// process lifetime, under double-checked locking: the common read path is a
/// single lock-free atomic load, and only a thread that observes an empty
/// slot takes the embedded creation [`SpinLock`] and constructs the value.
/// The publishing store uses release ordering and the fast-path load uses
/// acquire ordering, so any thread that observes a non-null slot observes a
/// fully-constructed value.
///
/// Both fields are zero-initializable and [`LazySlot::new`] is `const`, so a
/// slot can itself be a `static`; this is how the process-scope registry
/// slot in `plinth-runtime` is declared. Once populated, a slot is never
/// emptied again except by [`LazySlot::take`] during shutdown.
#[derive(Debug)]
pub struct LazySlot<T> {
    value: AtomicPtr<T>,
    creation: SpinLock,
}

// The automatic impls would mark the slot Send/Sync for *any* T, because
// AtomicPtr is unconditionally both. The slot owns a heap T and hands out
// shared references to it, so it needs exactly the bounds a Box + &T need.
unsafe impl<T: Send> Send for LazySlot<T> {}
unsafe impl<T: Send + Sync> Sync for LazySlot<T> {}

impl<T> LazySlot<T> {
    /// Creates an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: AtomicPtr::new(ptr::null_mut()),
            creation: SpinLock::new(),
        }
    }

    /// Returns the slot's value, constructing it on first call.
    ///
    /// `init` runs at most once per slot per process lifetime, no matter how
    /// many threads race the first access; every caller receives a reference
    /// to the same object. Allocation failure aborts the process; there is
    /// no recovery path at this layer.
    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> &T {
        // Fast path: lock-free read of an already-published value.
        let published = self.value.load(Ordering::Acquire);
        if !published.is_null() {
            // SAFETY: a non-null pointer was published with release ordering
            // after construction completed, and is only invalidated by
            // `take`, whose contract forbids later use of references.
            return unsafe { &*published };
        }

        let _guard = self.creation.lock();

        // Another thread may have finished construction while this one was
        // acquiring the creation lock.
        let published = self.value.load(Ordering::Acquire);
        if !published.is_null() {
            // SAFETY: as above.
            return unsafe { &*published };
        }

        let boxed = Box::into_raw(Box::new(init()));
        self.value.store(boxed, Ordering::Release);
        log::trace!("Lazy slot populated ({}).", std::any::type_name::<T>());
        // SAFETY: `boxed` was just leaked from a live Box and published; it
        // stays valid until `take` reclaims it.
        unsafe { &*boxed }
    }

    /// Returns the value if the slot has been populated, without constructing
    /// anything. The shutdown path uses this so that teardown never creates
    /// state that was never used.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        let published = self.value.load(Ordering::Acquire);
        if published.is_null() {
            None
        } else {
            // SAFETY: see `get_or_init`.
            Some(unsafe { &*published })
        }
    }

    /// Empties the slot and returns ownership of its value, if any.
    ///
    /// Only the shutdown path should call this.
    ///
    /// # Safety
    ///
    /// No reference previously returned by [`LazySlot::get_or_init`] or
    /// [`LazySlot::get`] may be used after this call. The caller must
    /// guarantee no other thread is accessing the slot concurrently.
    pub unsafe fn take(&self) -> Option<Box<T>> {
        let _guard = self.creation.lock();
        let published = self.value.swap(ptr::null_mut(), Ordering::AcqRel);
        if published.is_null() {
            None
        } else {
            // SAFETY: the pointer originated in Box::into_raw and has just
            // been unpublished, so this is the sole remaining owner.
            Some(unsafe { Box::from_raw(published) })
        }
    }
}

impl<T> Default for LazySlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for LazySlot<T> {
    fn drop(&mut self) {
        let published = *self.value.get_mut();
        if !published.is_null() {
            // SAFETY: exclusive access through &mut self; the pointer came
            // from Box::into_raw and was never reclaimed.
            drop(unsafe { Box::from_raw(published) });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn empty_slot_reports_absent() {
        let slot: LazySlot<u32> = LazySlot::new();
        assert!(slot.get().is_none());
    }

    #[test]
    fn get_or_init_constructs_exactly_once() {
        let constructions = AtomicUsize::new(0);
        let slot: LazySlot<u32> = LazySlot::new();

        let first = slot.get_or_init(|| {
            constructions.fetch_add(1, Ordering::SeqCst);
            7
        });
        let second = slot.get_or_init(|| {
            constructions.fetch_add(1, Ordering::SeqCst);
            13
        });

        assert_eq!(*first, 7);
        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        assert!(std::ptr::eq(first, second), "identity must be stable");
    }

    #[test]
    fn racing_first_access_yields_one_construction() {
        let constructions = AtomicUsize::new(0);
        let slot: LazySlot<Vec<u8>> = LazySlot::new();

        let addresses: HashSet<usize> = thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    s.spawn(|| {
                        let value = slot.get_or_init(|| {
                            constructions.fetch_add(1, Ordering::SeqCst);
                            vec![0u8; 64]
                        });
                        value as *const Vec<u8> as usize
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        assert_eq!(addresses.len(), 1, "all threads must see the same object");
    }

    #[test]
    fn take_returns_ownership_and_empties_the_slot() {
        let slot: LazySlot<String> = LazySlot::new();
        slot.get_or_init(|| "populated".to_string());

        // SAFETY: no outstanding references are used past this point and no
        // other thread touches the slot.
        let value = unsafe { slot.take() };
        assert_eq!(value.as_deref().map(String::as_str), Some("populated"));
        assert!(slot.get().is_none());

        // A second take on the now-empty slot is a no-op.
        // SAFETY: as above.
        assert!(unsafe { slot.take() }.is_none());
    }

    #[test]
    fn drop_releases_a_populated_slot() {
        struct CountsDrops<'a>(&'a AtomicUsize);
        impl Drop for CountsDrops<'_> {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let drops = AtomicUsize::new(0);
        {
            let slot: LazySlot<CountsDrops<'_>> = LazySlot::new();
            slot.get_or_init(|| CountsDrops(&drops));
        }
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }
}
