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

// Configuration types for the hdbpp-client tool

use super::options::{find_option, LIBNAME_KEY, OPTION_SEPARATOR};
use crate::event::AttrDataFormat;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClientConfig {
    pub backend: BackendSettings,
    #[serde(default)]
    pub attributes: Vec<AttributeSpec>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Identity and raw option list passed to the backend
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendSettings {
    pub id: String,

    /// `key=value` entries, forwarded to the backend as-is
    #[serde(default)]
    pub configuration: Vec<String>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            id: default_id(),
            configuration: Vec::new(),
        }
    }
}

impl BackendSettings {
    pub fn libname(&self) -> Option<&str> {
        find_option(&self.configuration, LIBNAME_KEY)
    }

    /// Point the configuration at another backend library.
    ///
    /// Existing `libname` entries are replaced in place, so the position of
    /// the entry in the list is kept.
    pub fn set_libname(&mut self, libname: &str) {
        let prefix = format!("{}{}", LIBNAME_KEY, OPTION_SEPARATOR);
        let entry = format!("{}{}", prefix, libname);

        let mut replaced = false;
        for item in self.configuration.iter_mut() {
            if item.starts_with(&prefix) {
                *item = entry.clone();
                replaced = true;
            }
        }

        if !replaced {
            self.configuration.insert(0, entry);
        }
    }
}

/// Attribute to register with the backend
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AttributeSpec {
    pub name: String,

    /// Tango data type code (e.g. 5 = DevDouble)
    pub data_type: i32,

    #[serde(default)]
    pub data_format: AttrDataFormat,

    #[serde(default)]
    pub write_type: i32,

    /// Time to live in hours, applied when the backend supports it
    #[serde(default)]
    pub ttl: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"

    #[serde(default = "default_log_format")]
    pub format: String, // "text", "json"
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_id() -> String { "hdbpp-client".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "text".to_string() }
