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

//! # Plinth Runtime
//!
//! The process-wide resource registry of the backend adapter layer, and the
//! single, ordered teardown path that runs when the hosting library is
//! unloaded.
//!
//! Adapter code obtains shared state through [`GlobalHandler::instance`] and
//! the typed accessors on the handler; every heavyweight global lives in a
//! lazily-populated slot owned by that one singleton. Rust never drops
//! `static` items, so without an explicit teardown the cached backend
//! handles would survive until the hosting dynamic library is gone and their
//! release entry points point into unmapped code. The [`shutdown`] path,
//! wired to the host environment's unload notification in [`unload`],
//! releases everything in a defined order instead.

#![warn(missing_docs)]

pub mod config;
pub mod global_handler;
pub mod shutdown;
pub mod unload;

pub use config::{TraceConfig, TraceLevel};
pub use global_handler::GlobalHandler;
pub use shutdown::{shutdown, shutdown_phase, ShutdownPhase};
