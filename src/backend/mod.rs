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

// Archiving backend module
//
// Provides the trait-based interface every historical-database backend
// implements, the plugin entry-point contract, and the loader that opens
// backend libraries at runtime.

pub mod loader;
pub mod plugin;
pub mod traits;

pub use loader::{BackendLoader, DynamicLibrary, DynamicLoader, LibraryHandle, LoadedBackend};
pub use plugin::{
    plugin_abi, FactoryHandle, GetDbFactoryFn, PluginAbiFn, GET_DB_FACTORY_SYMBOL,
    PLUGIN_ABI_SYMBOL,
};
pub use traits::{AbstractDb, DbFactory};
