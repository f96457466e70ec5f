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

//! Host-environment unload notifications.
//!
//! Each platform family contributes exactly one entry point that forwards to
//! [`crate::shutdown::shutdown`] when the hosting library is about to leave
//! the process. On Windows the loader tells us directly through `DllMain`;
//! elsewhere a termination function registered at the lowest legal priority
//! runs after every ordinary destructor in the image. In both cases the
//! forwarding is synchronous: teardown completes before the library is
//! actually unmapped.

#[cfg(windows)]
mod win32 {
    use windows::Win32::Foundation::{BOOL, HINSTANCE, TRUE};
    use windows::Win32::System::SystemServices::{
        DLL_PROCESS_ATTACH, DLL_PROCESS_DETACH, DLL_THREAD_ATTACH, DLL_THREAD_DETACH,
    };

    // Exported for cdylib builds of a backend plugin; the loader invokes it
    // with a reason code on every attach/detach event.
    #[no_mangle]
    #[allow(non_snake_case)]
    extern "system" fn DllMain(
        _module: HINSTANCE,
        reason: u32,
        _reserved: *mut core::ffi::c_void,
    ) -> BOOL {
        match reason {
            DLL_PROCESS_DETACH => {
                // SAFETY: at process detach the loader has already terminated
                // or detached every other thread, so no adapter call can be
                // in flight and no registry reference can be used afterwards.
                unsafe { crate::shutdown::shutdown() };
            }
            // Attach and per-thread notifications need no registry work.
            DLL_PROCESS_ATTACH | DLL_THREAD_ATTACH | DLL_THREAD_DETACH => {}
            _ => {}
        }
        TRUE
    }
}

#[cfg(unix)]
mod posix {
    unsafe extern "C" fn unload() {
        // SAFETY: termination functions run while the image is being torn
        // down, after the host has stopped calling into the adapter; nothing
        // can observe the registry after this point.
        unsafe { crate::shutdown::shutdown() };
    }

    // Priority 101 is the lowest the toolchain accepts (100 and below are
    // reserved). `.fini_array` entries run in reverse array order, with the
    // unsorted section ahead of the sorted ones, so the lowest-numbered
    // entry runs after every ordinary destructor in the image.
    #[cfg(not(target_vendor = "apple"))]
    #[used]
    #[link_section = ".fini_array.00101"]
    static UNLOAD_HOOK: unsafe extern "C" fn() = unload;

    // Mach-O has no priority-sorted termination sections; mod_term_func
    // entries run in reverse registration order when the image is unloaded.
    #[cfg(target_vendor = "apple")]
    #[used]
    #[link_section = "__DATA,__mod_term_func"]
    static UNLOAD_HOOK: unsafe extern "C" fn() = unload;
}
