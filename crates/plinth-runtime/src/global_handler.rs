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

//! The process-wide registry of lazily-constructed global objects.

use std::sync::{Mutex, PoisonError};

use plinth_core::sync::LazySlot;
use plinth_core::PlatformHandle;

use crate::config::TraceConfig;

/// The slot holding the handler itself. The handler is one process-scope
/// lazy slot, exactly like the slots it owns for its fields.
static HANDLER: LazySlot<GlobalHandler> = LazySlot::new();

/// Registry of every heavyweight global the adapter layer owns.
///
/// A single heap-allocated instance exists per process, created on the first
/// call to [`GlobalHandler::instance`] and destroyed only by the shutdown
/// path in [`crate::shutdown`]. Each member is deferred into its own
/// [`LazySlot`], so a process that never touches a given resource kind never
/// pays for it, and never has to tear it down.
///
/// The handler is an identity, not a value: it is neither `Clone` nor
/// `Copy`, and adapter code only ever sees it by reference.
#[derive(Debug)]
pub struct GlobalHandler {
    /// Every discovered platform object, owned by the registry. The `Mutex`
    /// guards the cache *contents*; slot creation is guarded by the slot's
    /// own creation lock.
    platform_cache: LazySlot<Mutex<Vec<PlatformHandle>>>,
    /// Process-wide trace settings.
    trace: LazySlot<TraceConfig>,
}

impl GlobalHandler {
    pub(crate) fn new() -> Self {
        log::debug!("Global handler created.");
        Self {
            platform_cache: LazySlot::new(),
            trace: LazySlot::new(),
        }
    }

    /// Returns the process-wide handler, allocating it on first call.
    ///
    /// The reference is valid from first call until shutdown begins. Calling
    /// this after the unload notification has run is a contract violation
    /// (the registry exists precisely so that nothing global has to survive
    /// past that point); it is not detected at runtime.
    #[must_use]
    pub fn instance() -> &'static GlobalHandler {
        HANDLER.get_or_init(GlobalHandler::new)
    }

    /// The handler if it was ever created, without creating it.
    pub(crate) fn peek() -> Option<&'static GlobalHandler> {
        HANDLER.get()
    }

    /// Releases the handler itself.
    ///
    /// # Safety
    ///
    /// Only the shutdown path may call this, with no concurrent registry
    /// users and no later use of previously returned references.
    pub(crate) unsafe fn release() -> Option<Box<GlobalHandler>> {
        // SAFETY: forwarded contract.
        unsafe { HANDLER.take() }
    }

    /// The cache of discovered platform objects.
    ///
    /// The returned `Mutex` is the content lock for the cache: callers lock
    /// it themselves before reading or mutating the entries, and the
    /// registry never locks it on their behalf.
    #[must_use]
    pub fn platform_cache(&self) -> &Mutex<Vec<PlatformHandle>> {
        self.platform_cache.get_or_init(|| Mutex::new(Vec::new()))
    }

    /// Process-wide trace settings, parsed from the environment on first use.
    #[must_use]
    pub fn trace_config(&self) -> &TraceConfig {
        self.trace.get_or_init(TraceConfig::from_env)
    }

    /// The trace settings if they were ever parsed, without parsing them.
    /// The shutdown path treats an absent config as tracing-off rather than
    /// constructing one mid-teardown.
    pub(crate) fn peek_trace_config(&self) -> Option<&TraceConfig> {
        self.trace.get()
    }

    /// Releases every cached platform handle and empties the cache.
    ///
    /// Handles are popped and dropped one at a time rather than bulk-cleared,
    /// so a release entry point that needs to observe the cache mid-teardown
    /// sees a consistent state at every step. A poisoned content lock is
    /// recovered; teardown always completes.
    ///
    /// ## Returns
    /// The number of handles released.
    pub(crate) fn drain_platform_cache(&self) -> usize {
        let Some(cache) = self.platform_cache.get() else {
            return 0;
        };
        let mut entries = cache.lock().unwrap_or_else(PoisonError::into_inner);
        let mut released = 0;
        while let Some(handle) = entries.pop() {
            drop(handle);
            released += 1;
        }
        released
    }
}
