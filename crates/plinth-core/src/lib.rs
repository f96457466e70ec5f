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

//! # Plinth Core
//!
//! Foundational crate for the backend adapter layer: synchronization
//! primitives that are usable from a zero-initialized `static` context, the
//! lazily-constructed singleton slot built on top of them, and the opaque
//! handle contract through which the adapter owns native backend objects.
//!
//! Nothing in this crate talks to a backend API. It only provides the
//! lifecycle and concurrency scaffolding that `plinth-runtime` assembles
//! into the process-wide registry.

#![warn(missing_docs)]

pub mod platform;
pub mod sync;

pub use platform::PlatformHandle;
pub use sync::{LazySlot, SpinGuard, SpinLock};
