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

// Loading backend libraries and resolving their factory entry point

use super::plugin::{
    plugin_abi, FactoryHandle, GetDbFactoryFn, PluginAbiFn, GET_DB_FACTORY_SYMBOL,
    PLUGIN_ABI_SYMBOL,
};
use super::traits::DbFactory;
use crate::error::ClientError;
use libloading::Library;
use std::ffi::CStr;
use tracing::{debug, info};

/// Keeps a backend library mapped; dropping it unloads the library
pub trait LibraryHandle: Send {
    /// Name the library was opened with
    fn name(&self) -> &str;
}

/// A backend factory together with the library that provides its code
///
/// Fields drop in declaration order: the factory is always released before
/// the library is unloaded.
pub struct LoadedBackend {
    factory: Box<dyn DbFactory>,
    library: Box<dyn LibraryHandle>,
}

impl LoadedBackend {
    pub fn new(factory: Box<dyn DbFactory>, library: Box<dyn LibraryHandle>) -> Self {
        Self { factory, library }
    }

    pub fn factory(&self) -> &dyn DbFactory {
        self.factory.as_ref()
    }

    pub fn library_name(&self) -> &str {
        self.library.name()
    }
}

/// Source of backend factories, keyed by library name
pub trait BackendLoader {
    /// Open `libname` and obtain its factory
    fn load(&self, libname: &str) -> Result<LoadedBackend, ClientError>;
}

/// Shared library opened through the platform dynamic loader
pub struct DynamicLibrary {
    name: String,
    // Unloaded (dlclose) when dropped
    _library: Library,
}

impl LibraryHandle for DynamicLibrary {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for DynamicLibrary {
    fn drop(&mut self) {
        debug!("Unloading backend library '{}'", self.name);
    }
}

/// Loader backed by `dlopen`/`LoadLibrary`
///
/// Only Rust backends that export their factory with
/// [`export_db_factory!`](crate::export_db_factory) against the same
/// `hdbpp-client` version can be loaded; their `hdbppPluginAbi` tag is
/// checked before `getDBFactory` is called. Libraries of other HDB++
/// implementations (for instance the C++ `libhdb++timescale.so`) fail with
/// a symbol error. Loading runs the library's initialisers, so `libname`
/// must name a trusted library built by the same compiler as this crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct DynamicLoader;

impl DynamicLoader {
    pub fn new() -> Self {
        Self
    }
}

// Resolve all symbols at load time, keep them out of the global namespace
#[cfg(unix)]
unsafe fn open_library(libname: &str) -> Result<Library, libloading::Error> {
    use libloading::os::unix::{Library as UnixLibrary, RTLD_LOCAL, RTLD_NOW};

    UnixLibrary::open(Some(libname), RTLD_NOW | RTLD_LOCAL).map(Library::from)
}

#[cfg(not(unix))]
unsafe fn open_library(libname: &str) -> Result<Library, libloading::Error> {
    Library::new(libname)
}

impl BackendLoader for DynamicLoader {
    fn load(&self, libname: &str) -> Result<LoadedBackend, ClientError> {
        info!("Loading backend library '{}'", libname);

        // SAFETY: running the library's initialisers is the point of loading
        // a backend; the library is trusted configuration input.
        let library = unsafe { open_library(libname) }.map_err(|source| ClientError::Load {
            libname: libname.to_string(),
            source,
        })?;

        let symbol_error = |symbol: &[u8], reason: String| ClientError::Symbol {
            symbol: String::from_utf8_lossy(symbol).into_owned(),
            libname: libname.to_string(),
            reason,
        };

        // SAFETY: backends export `getDBFactory` with the `GetDbFactoryFn`
        // signature. The copied pointer is only called while `library` is alive.
        let create_factory: GetDbFactoryFn = unsafe {
            library
                .get::<GetDbFactoryFn>(GET_DB_FACTORY_SYMBOL)
                .map(|symbol| *symbol)
                .map_err(|e| symbol_error(GET_DB_FACTORY_SYMBOL, e.to_string()))?
        };

        // SAFETY: `export_db_factory!` exports `hdbppPluginAbi` as a
        // zero-argument function returning a static nul-terminated string.
        let backend_abi = unsafe {
            let abi_fn = library
                .get::<PluginAbiFn>(PLUGIN_ABI_SYMBOL)
                .map(|symbol| *symbol)
                .map_err(|e| {
                    symbol_error(
                        PLUGIN_ABI_SYMBOL,
                        format!("not a Rust hdbpp backend library: {}", e),
                    )
                })?;
            let tag = abi_fn();
            if tag.is_null() {
                return Err(symbol_error(PLUGIN_ABI_SYMBOL, "null ABI tag".to_string()));
            }
            CStr::from_ptr(tag).to_string_lossy().into_owned()
        };
        let host_abi = plugin_abi().to_string_lossy();
        if backend_abi != host_abi {
            return Err(symbol_error(
                PLUGIN_ABI_SYMBOL,
                format!("backend built against {}, expected {}", backend_abi, host_abi),
            ));
        }

        // SAFETY: the pointer comes from the entry point that owns the
        // allocation protocol of `FactoryHandle`.
        let factory = unsafe { FactoryHandle::from_raw(create_factory()) }.ok_or_else(|| {
            symbol_error(
                GET_DB_FACTORY_SYMBOL,
                "entry point returned a null factory".to_string(),
            )
        })?;

        debug!("Resolved factory entry point in '{}'", libname);

        Ok(LoadedBackend::new(
            factory,
            Box::new(DynamicLibrary {
                name: libname.to_string(),
                _library: library,
            }),
        ))
    }
}
