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

// Historical database traits implemented by archiving backends

use crate::error::BackendResult;
use crate::event::{AttrConfEventData, EventData, HdbEventDataType, HdbppFeature};

/// Capability set of a historical database backend
///
/// Every backend library hands out an implementation of this trait through
/// its [`DbFactory`]. Failures are reported as
/// [`BackendError`](crate::error::BackendError), plain owned data that stays
/// valid after the backend library is unloaded; callers receive it
/// unchanged.
pub trait AbstractDb: Send {
    /// Store a single attribute event
    fn insert_event(&mut self, event: &EventData, data_type: &HdbEventDataType) -> BackendResult;

    /// Store a batch of attribute events
    ///
    /// Backends that do not report [`HdbppFeature::BatchInserts`] usually
    /// fall back to inserting one by one.
    fn insert_events(&mut self, events: Vec<(EventData, HdbEventDataType)>) -> BackendResult;

    /// Store an attribute configuration change
    fn insert_param_event(
        &mut self,
        data: &AttrConfEventData,
        data_type: &HdbEventDataType,
    ) -> BackendResult;

    /// Register an attribute for archiving
    ///
    /// # Arguments
    /// * `name` - Fully qualified attribute name
    /// * `data_type` - Tango data type code
    /// * `format` - Data format code (scalar, spectrum, image)
    /// * `write_type` - Write access code
    fn add_attribute(
        &mut self,
        name: &str,
        data_type: i32,
        format: i32,
        write_type: i32,
    ) -> BackendResult;

    /// Set the time-to-live, in hours, of an attribute's stored data
    fn update_ttl(&mut self, name: &str, ttl: u32) -> BackendResult;

    /// Record an archiving lifecycle event (start, stop, pause, ...)
    fn insert_history_event(&mut self, name: &str, event: u8) -> BackendResult;

    /// Whether the backend implements an optional feature
    fn supported(&self, feature: HdbppFeature) -> bool;
}

/// Factory exported by a backend library
pub trait DbFactory: Send {
    /// Build a database object for `id` from the raw `key=value` list.
    ///
    /// Returns `None` when the backend cannot produce one.
    fn create_db(&self, id: &str, configuration: &[String]) -> Option<Box<dyn AbstractDb>>;
}
