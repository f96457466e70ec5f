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

//! Synchronization primitives safe to embed in zero-initialized globals.
//!
//! A `std::sync::Mutex` carries platform state that makes it unsuitable as a
//! bare field of a long-lived global in this layer (its contents must be torn
//! down through the explicit shutdown path, never by implicit destructor
//! ordering). Everything here is `const`-constructible instead: [`SpinLock`]
//! is a single atomic flag, and [`LazySlot`] is a null pointer plus such a
//! flag. A full mutex is only ever created *behind* a [`LazySlot`].

pub mod lazy;
pub mod spin;

pub use lazy::LazySlot;
pub use spin::{SpinGuard, SpinLock};
