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

//! Owning wrapper around a native platform object.

use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

/// The backend's release entry point for one platform object.
///
/// # Safety
///
/// Implementations are called exactly once per handle, with the pointer the
/// handle was constructed from, and must free every resource the pointee
/// owns.
pub type ReleaseFn = unsafe fn(NonNull<c_void>);

/// An owned, opaque native platform object.
///
/// The handle pairs the raw pointer produced by the (out-of-scope) discovery
/// routine with the backend entry point that releases it. Dropping the handle
/// invokes that entry point exactly once. Between construction and drop the
/// pointee is never read or written through the handle.
///
/// Handles live in the registry's platform cache and are owned by it, not by
/// adapter callers; the shutdown drain releases them one at a time.
pub struct PlatformHandle {
    raw: NonNull<c_void>,
    release: ReleaseFn,
}

// The pointee is never aliased through the handle, and the cache lock
// serializes every access, so moving a handle across threads is sound.
unsafe impl Send for PlatformHandle {}

impl PlatformHandle {
    /// Wraps a native platform object together with its release entry point.
    ///
    /// # Safety
    ///
    /// `raw` must point to a live platform object that the caller uniquely
    /// owns, and `release` must be the matching release entry point for it.
    /// Ownership transfers to the returned handle.
    #[must_use]
    pub unsafe fn from_raw(raw: NonNull<c_void>, release: ReleaseFn) -> Self {
        Self { raw, release }
    }

    /// Returns the raw native pointer without transferring ownership.
    #[must_use]
    pub fn as_ptr(&self) -> *mut c_void {
        self.raw.as_ptr()
    }
}

impl Drop for PlatformHandle {
    fn drop(&mut self) {
        // SAFETY: `from_raw` transferred unique ownership of a live object,
        // and Drop runs at most once, so this is the single release call the
        // ReleaseFn contract requires.
        unsafe { (self.release)(self.raw) };
    }
}

impl fmt::Debug for PlatformHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformHandle")
            .field("raw", &self.raw.as_ptr())
            .finish_non_exhaustive()
    }
}
