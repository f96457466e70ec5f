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

//! The single, ordered teardown path of the registry.
//!
//! Teardown is triggered by the host environment's unload notification (see
//! [`crate::unload`]) and runs exactly once: cached resources are drained
//! first, one element at a time, and the [`GlobalHandler`] itself is
//! released last. Nothing here synchronizes against in-flight adapter
//! calls; the unload notification is the point at which the host guarantees
//! there are none.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::config::TraceConfig;
use crate::global_handler::GlobalHandler;

const NOT_STARTED: u8 = 0;
const DRAINING: u8 = 1;
const RELEASED: u8 = 2;

static PHASE: AtomicU8 = AtomicU8::new(NOT_STARTED);

/// Where the process is in its teardown lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownPhase {
    /// The registry is live (or was never created).
    NotStarted,
    /// The teardown body is running.
    Draining,
    /// Terminal: the registry has been released. Calling
    /// [`GlobalHandler::instance`] from here on is a contract violation.
    Released,
}

/// The current teardown phase.
#[must_use]
pub fn shutdown_phase() -> ShutdownPhase {
    match PHASE.load(Ordering::Acquire) {
        NOT_STARTED => ShutdownPhase::NotStarted,
        DRAINING => ShutdownPhase::Draining,
        _ => ShutdownPhase::Released,
    }
}

/// Tears down the registry: drains every cached resource, then releases the
/// [`GlobalHandler`] itself.
///
/// The `NotStarted → Draining` edge is claimed with a compare-exchange, so
/// the teardown body runs exactly once no matter how many unload
/// notifications the host delivers. Teardown never constructs state the
/// process never used: a handler that was never created is not created just
/// to be destroyed, and absent trace settings are treated as tracing-off
/// rather than parsed mid-teardown.
///
/// # Safety
///
/// The caller must guarantee that no other thread is inside the registry and
/// that no reference previously obtained from it (the handler itself, a
/// cache, a trace config) is used after this call. The host environment's
/// unload notification provides exactly this guarantee.
pub unsafe fn shutdown() {
    if PHASE
        .compare_exchange(NOT_STARTED, DRAINING, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return;
    }

    let mut lifecycle_trace = false;
    if let Some(handler) = GlobalHandler::peek() {
        // Peek only: an absent trace config means tracing was never switched
        // on, and teardown must not construct state the process never used.
        lifecycle_trace = handler
            .peek_trace_config()
            .is_some_and(TraceConfig::lifecycle_enabled);
        if lifecycle_trace {
            log::info!("Backend registry shutting down.");
        }
        let released = handler.drain_platform_cache();
        if lifecycle_trace {
            log::debug!("Drained {released} cached platform handle(s).");
        }
    }

    // SAFETY: forwarded from this function's contract.
    drop(unsafe { GlobalHandler::release() });

    PHASE.store(RELEASED, Ordering::Release);
    if lifecycle_trace {
        log::debug!("Backend registry released.");
    }
}
