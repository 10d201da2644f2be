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

// HDB++ client with runtime-loaded archiving backends
//
// This crate sits between an archiver and its historical database:
// - Reads the backend library name from a `key=value` option list
// - Loads the library and resolves its `getDBFactory` entry point
// - Builds the backend's database object through that factory
// - Forwards events, attribute registrations, TTL updates and history
//   events to it unchanged

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod registration;

// Re-export main types
pub use backend::{AbstractDb, BackendLoader, DbFactory, DynamicLoader, LoadedBackend};
pub use client::{get_db_factory, HdbClient, HdbClientFactory};
pub use config::{load_config, load_config_with_env, parse_options, ClientConfig};
pub use error::{BackendError, BackendResult, ClientError};
pub use event::{
    AttrConfEventData, AttrDataFormat, AttrQuality, AttributeInfo, AttributeValue, EventData,
    HdbEventDataType, HdbppFeature, HistoryEvent,
};
pub use registration::register_attributes;
