// Copyright 2025 coScene
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

// Entry-point contract between the client and backend libraries
//
// A backend library exports one zero-argument C-linkage function named
// `getDBFactory`. It returns an owned, heap-allocated factory that the
// caller frees. The factory crosses the boundary as a Rust trait object, so
// only Rust backends built with `export_db_factory!` can be loaded. Next to
// the factory the macro exports `hdbppPluginAbi`, a tag the loader checks
// before calling `getDBFactory`; a library without it (such as a C++ HDB++
// backend) is rejected.
//
// Remaining requirements on a backend, which the tag cannot check:
// - built by the same compiler as the host
// - uses the default global allocator, since vectors and strings are
//   allocated on one side and freed on the other
// - does not panic out of `AbstractDb`/`DbFactory` methods

use super::traits::DbFactory;
use std::ffi::{c_char, CStr};

/// Name of the factory entry point every backend library exports
pub const GET_DB_FACTORY_SYMBOL: &[u8] = b"getDBFactory";

/// Name of the entry point returning the backend's plugin ABI tag
pub const PLUGIN_ABI_SYMBOL: &[u8] = b"hdbppPluginAbi";

const PLUGIN_ABI_TAG: &[u8] =
    concat!("hdbpp-client/", env!("CARGO_PKG_VERSION"), "\0").as_bytes();

/// Signature of the exported ABI tag entry point
pub type PluginAbiFn = unsafe extern "C" fn() -> *const c_char;

/// ABI tag of this build; backends must report the same one
pub fn plugin_abi() -> &'static CStr {
    // SAFETY: the tag is a literal with a single trailing nul
    unsafe { CStr::from_bytes_with_nul_unchecked(PLUGIN_ABI_TAG) }
}

#[doc(hidden)]
pub fn plugin_abi_ptr() -> *const c_char {
    plugin_abi().as_ptr()
}

/// Signature of the exported factory entry point
#[allow(improper_ctypes_definitions)]
pub type GetDbFactoryFn = unsafe extern "C" fn() -> *mut FactoryHandle;

/// Thin-pointer wrapper so a factory trait object can cross `extern "C"`
pub struct FactoryHandle {
    factory: Box<dyn DbFactory>,
}

impl FactoryHandle {
    /// Leak `factory` into a raw pointer for returning from an entry point
    pub fn into_raw(factory: Box<dyn DbFactory>) -> *mut FactoryHandle {
        Box::into_raw(Box::new(FactoryHandle { factory }))
    }

    /// Take back ownership of a factory returned by an entry point.
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    /// `ptr` must be null or come from [`FactoryHandle::into_raw`] in a
    /// library built by the same compiler, and must not be used again.
    pub unsafe fn from_raw(ptr: *mut FactoryHandle) -> Option<Box<dyn DbFactory>> {
        if ptr.is_null() {
            return None;
        }
        let handle = Box::from_raw(ptr);
        Some(handle.factory)
    }
}

/// Export `getDBFactory` and `hdbppPluginAbi` from a backend crate built
/// as a `cdylib`.
///
/// The factory type must implement [`DbFactory`] and `Default`; a new
/// instance is created on every call.
///
/// ```ignore
/// #[derive(Default)]
/// struct MyFactory;
///
/// impl hdbpp_client::DbFactory for MyFactory { /* ... */ }
///
/// hdbpp_client::export_db_factory!(MyFactory);
/// ```
#[macro_export]
macro_rules! export_db_factory {
    ($factory:ty) => {
        #[no_mangle]
        #[allow(non_snake_case, improper_ctypes_definitions)]
        pub extern "C" fn getDBFactory() -> *mut $crate::backend::FactoryHandle {
            let factory: ::std::boxed::Box<dyn $crate::backend::DbFactory> =
                ::std::boxed::Box::new(<$factory as ::std::default::Default>::default());
            $crate::backend::FactoryHandle::into_raw(factory)
        }

        #[no_mangle]
        #[allow(non_snake_case)]
        pub extern "C" fn hdbppPluginAbi() -> *const ::std::ffi::c_char {
            $crate::backend::plugin::plugin_abi_ptr()
        }
    };
}
