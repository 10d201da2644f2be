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

// Backend library for the loader integration tests
//
// Every call is appended to the file named by the `journal=` option so the
// host side can check what reached the backend after the library is gone.
// `reject=true` makes the factory return no database object, and attribute
// names starting with `fail/` make `add_attribute` fail.

use anyhow::{anyhow, Context};
use hdbpp_client::event::{AttrConfEventData, EventData, HdbEventDataType, HdbppFeature};
use hdbpp_client::{parse_options, AbstractDb, BackendError, BackendResult, DbFactory};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

fn append(journal: Option<&Path>, line: &str) -> anyhow::Result<()> {
    let Some(path) = journal else {
        return Ok(());
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open journal {}", path.display()))?;
    writeln!(file, "{}", line).context("Failed to write journal")?;
    Ok(())
}

struct FixtureDb {
    journal: Option<PathBuf>,
}

impl FixtureDb {
    fn record(&self, line: String) -> BackendResult {
        append(self.journal.as_deref(), &line)?;
        Ok(())
    }
}

impl AbstractDb for FixtureDb {
    fn insert_event(&mut self, event: &EventData, _data_type: &HdbEventDataType) -> BackendResult {
        self.record(format!("event {}", event.attr_name))
    }

    fn insert_events(&mut self, events: Vec<(EventData, HdbEventDataType)>) -> BackendResult {
        self.record(format!("events {}", events.len()))
    }

    fn insert_param_event(
        &mut self,
        data: &AttrConfEventData,
        _data_type: &HdbEventDataType,
    ) -> BackendResult {
        self.record(format!("param {}", data.attr_name))
    }

    fn add_attribute(
        &mut self,
        name: &str,
        data_type: i32,
        format: i32,
        write_type: i32,
    ) -> BackendResult {
        if name.starts_with("fail/") {
            let err = anyhow!("attribute table is read-only")
                .context(format!("cannot add attribute '{}'", name));
            return Err(BackendError::from(err));
        }
        self.record(format!("add {} {} {} {}", name, data_type, format, write_type))
    }

    fn update_ttl(&mut self, name: &str, ttl: u32) -> BackendResult {
        self.record(format!("ttl {} {}", name, ttl))
    }

    fn insert_history_event(&mut self, name: &str, event: u8) -> BackendResult {
        self.record(format!("history {} {}", name, event))
    }

    fn supported(&self, feature: HdbppFeature) -> bool {
        feature == HdbppFeature::Ttl
    }
}

impl Drop for FixtureDb {
    fn drop(&mut self) {
        let _ = append(self.journal.as_deref(), "drop db");
    }
}

#[derive(Default)]
pub struct FixtureFactory {
    // Journal of the last database created, written to on drop
    journal: Mutex<Option<PathBuf>>,
}

impl DbFactory for FixtureFactory {
    fn create_db(&self, id: &str, configuration: &[String]) -> Option<Box<dyn AbstractDb>> {
        let options = parse_options(configuration, "=");
        let journal = options.get("journal").map(PathBuf::from);

        let _ = append(
            journal.as_deref(),
            &format!("create {} {}", id, configuration.len()),
        );
        if let Ok(mut last) = self.journal.lock() {
            *last = journal.clone();
        }

        if options.get("reject").map(String::as_str) == Some("true") {
            return None;
        }
        Some(Box::new(FixtureDb { journal }))
    }
}

impl Drop for FixtureFactory {
    fn drop(&mut self) {
        if let Ok(journal) = self.journal.get_mut() {
            let _ = append(journal.as_deref(), "drop factory");
        }
    }
}

#[cfg(not(any(feature = "null-factory", feature = "untagged")))]
hdbpp_client::export_db_factory!(FixtureFactory);

#[cfg(feature = "null-factory")]
mod null_factory {
    #[no_mangle]
    #[allow(non_snake_case, improper_ctypes_definitions)]
    pub extern "C" fn getDBFactory() -> *mut hdbpp_client::backend::FactoryHandle {
        std::ptr::null_mut()
    }

    #[no_mangle]
    #[allow(non_snake_case)]
    pub extern "C" fn hdbppPluginAbi() -> *const std::ffi::c_char {
        hdbpp_client::backend::plugin_abi().as_ptr()
    }
}

// Must never be called: the loader rejects the library first
#[cfg(all(feature = "untagged", not(feature = "null-factory")))]
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn getDBFactory() -> *mut std::ffi::c_void {
    std::process::abort()
}
