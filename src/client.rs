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

// Client that loads an archiving backend at runtime and forwards calls to it

use crate::backend::{AbstractDb, BackendLoader, DbFactory, DynamicLoader, LoadedBackend};
use crate::config::{parse_options, LIBNAME_KEY, OPTION_SEPARATOR};
use crate::error::{BackendResult, ClientError};
use crate::event::{AttrConfEventData, EventData, HdbEventDataType, HdbppFeature};
use tracing::{debug, error, info};

/// Historical database client backed by a dynamically loaded library
///
/// The `libname` entry of the configuration selects the library. The full
/// configuration list is then handed to the library's factory, and every
/// operation is forwarded unchanged to the database object it returns.
pub struct HdbClient {
    // Drop order matters: the database object, then the factory, then the
    // library that holds their code.
    db: Box<dyn AbstractDb>,
    backend: LoadedBackend,
    id: String,
    libname: String,
}

impl HdbClient {
    /// Load the backend named by `libname` through the platform loader.
    ///
    /// The library must be a Rust backend exporting its factory with
    /// [`export_db_factory!`](crate::export_db_factory), built by the same
    /// compiler against the same version of this crate. Other libraries are
    /// rejected with [`ClientError::Symbol`] before any of their code beyond
    /// the loader's initialisers runs. See [`DynamicLoader`].
    ///
    /// Errors returned by forwarded operations are [`BackendError`]s, plain
    /// data that stays valid after the client and its library are dropped.
    ///
    /// [`BackendError`]: crate::error::BackendError
    pub fn new(id: &str, configuration: &[String]) -> Result<Self, ClientError> {
        Self::with_loader(id, configuration, &DynamicLoader)
    }

    /// Build a client, resolving the backend through `loader`
    pub fn with_loader(
        id: &str,
        configuration: &[String],
        loader: &dyn BackendLoader,
    ) -> Result<Self, ClientError> {
        let options = parse_options(configuration, OPTION_SEPARATOR);
        let libname = options
            .get(LIBNAME_KEY)
            .cloned()
            .ok_or_else(|| ClientError::MissingKey {
                key: LIBNAME_KEY.to_string(),
            })?;

        let backend = loader.load(&libname)?;

        let db = backend
            .factory()
            .create_db(id, configuration)
            .ok_or_else(|| ClientError::CreateDb {
                libname: libname.clone(),
            })?;

        info!("Backend '{}' ready for '{}'", libname, id);

        Ok(Self {
            db,
            backend,
            id: id.to_string(),
            libname,
        })
    }

    /// Build a client or terminate the process.
    ///
    /// On failure the diagnostic is written to standard output and the
    /// process exits with status 1. Prefer [`HdbClient::new`] in code that
    /// can handle the error.
    pub fn new_or_exit(id: &str, configuration: &[String]) -> Self {
        match Self::new(id, configuration) {
            Ok(client) => client,
            Err(e) => {
                debug!("Client construction failed: {:?}", e);
                println!("HdbClient: {}", e);
                std::process::exit(1);
            }
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn libname(&self) -> &str {
        &self.libname
    }

    pub fn insert_event(
        &mut self,
        event: &EventData,
        data_type: &HdbEventDataType,
    ) -> BackendResult {
        self.db.insert_event(event, data_type)
    }

    pub fn insert_events(&mut self, events: Vec<(EventData, HdbEventDataType)>) -> BackendResult {
        self.db.insert_events(events)
    }

    pub fn insert_param_event(
        &mut self,
        data: &AttrConfEventData,
        data_type: &HdbEventDataType,
    ) -> BackendResult {
        self.db.insert_param_event(data, data_type)
    }

    pub fn add_attribute(
        &mut self,
        name: &str,
        data_type: i32,
        format: i32,
        write_type: i32,
    ) -> BackendResult {
        self.db.add_attribute(name, data_type, format, write_type)
    }

    pub fn update_ttl(&mut self, name: &str, ttl: u32) -> BackendResult {
        self.db.update_ttl(name, ttl)
    }

    pub fn insert_history_event(&mut self, name: &str, event: u8) -> BackendResult {
        self.db.insert_history_event(name, event)
    }

    pub fn supported(&self, feature: HdbppFeature) -> bool {
        self.db.supported(feature)
    }
}

impl Drop for HdbClient {
    fn drop(&mut self) {
        debug!(
            "Releasing backend '{}' for '{}'",
            self.backend.library_name(),
            self.id
        );
    }
}

// A client is itself a backend, so clients can be stacked behind the same
// factory convention.
impl AbstractDb for HdbClient {
    fn insert_event(&mut self, event: &EventData, data_type: &HdbEventDataType) -> BackendResult {
        HdbClient::insert_event(self, event, data_type)
    }

    fn insert_events(&mut self, events: Vec<(EventData, HdbEventDataType)>) -> BackendResult {
        HdbClient::insert_events(self, events)
    }

    fn insert_param_event(
        &mut self,
        data: &AttrConfEventData,
        data_type: &HdbEventDataType,
    ) -> BackendResult {
        HdbClient::insert_param_event(self, data, data_type)
    }

    fn add_attribute(
        &mut self,
        name: &str,
        data_type: i32,
        format: i32,
        write_type: i32,
    ) -> BackendResult {
        HdbClient::add_attribute(self, name, data_type, format, write_type)
    }

    fn update_ttl(&mut self, name: &str, ttl: u32) -> BackendResult {
        HdbClient::update_ttl(self, name, ttl)
    }

    fn insert_history_event(&mut self, name: &str, event: u8) -> BackendResult {
        HdbClient::insert_history_event(self, name, event)
    }

    fn supported(&self, feature: HdbppFeature) -> bool {
        HdbClient::supported(self, feature)
    }
}

/// Factory producing [`HdbClient`]s through the standard factory interface
#[derive(Debug, Default, Clone, Copy)]
pub struct HdbClientFactory;

impl DbFactory for HdbClientFactory {
    fn create_db(&self, id: &str, configuration: &[String]) -> Option<Box<dyn AbstractDb>> {
        match HdbClient::new(id, configuration) {
            Ok(client) => Some(Box::new(client)),
            Err(e) => {
                error!("Failed to create client for '{}': {}", id, e);
                None
            }
        }
    }
}

/// New factory instance on every call
pub fn get_db_factory() -> Box<dyn DbFactory> {
    Box::new(HdbClientFactory)
}

#[cfg(feature = "plugin")]
crate::export_db_factory!(HdbClientFactory);
