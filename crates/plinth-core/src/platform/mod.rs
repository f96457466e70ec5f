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

//! The opaque boundary to native backend platform objects.
//!
//! This layer never inspects or interprets a platform object; it only stores,
//! iterates, and eventually releases it. The discovery routine that actually
//! creates platform objects lives above this crate.

pub mod handle;

pub use handle::{PlatformHandle, ReleaseFn};
