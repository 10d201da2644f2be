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

// Registering configured attributes with a backend

use crate::backend::AbstractDb;
use crate::config::AttributeSpec;
use crate::event::{HdbppFeature, DB_ADD, DB_UPDATETTL};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Add every attribute in `attributes` to `db` and apply its TTL.
///
/// Stops at the first backend error. Returns the number of attributes added.
pub fn register_attributes(db: &mut dyn AbstractDb, attributes: &[AttributeSpec]) -> Result<usize> {
    let ttl_supported = db.supported(HdbppFeature::Ttl);

    for attribute in attributes {
        db.add_attribute(
            &attribute.name,
            attribute.data_type,
            attribute.data_format.code(),
            attribute.write_type,
        )
        .with_context(|| format!("Failed to add attribute '{}'", attribute.name))?;

        db.insert_history_event(&attribute.name, DB_ADD)
            .with_context(|| format!("Failed to log add event for '{}'", attribute.name))?;

        if let Some(ttl) = attribute.ttl {
            if ttl_supported {
                db.update_ttl(&attribute.name, ttl)
                    .with_context(|| format!("Failed to set ttl of '{}'", attribute.name))?;

                db.insert_history_event(&attribute.name, DB_UPDATETTL)
                    .with_context(|| {
                        format!("Failed to log ttl update for '{}'", attribute.name)
                    })?;
            } else {
                warn!(
                    "Backend does not support ttl, ignoring ttl {} of '{}'",
                    ttl, attribute.name
                );
            }
        }

        info!("Registered attribute '{}'", attribute.name);
    }

    Ok(attributes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BackendError, BackendResult};
    use crate::event::{AttrConfEventData, AttrDataFormat, EventData, HdbEventDataType};

    #[derive(Default)]
    struct RecordingDb {
        ttl: bool,
        fail_on: Option<String>,
        calls: Vec<String>,
    }

    impl AbstractDb for RecordingDb {
        fn insert_event(&mut self, _: &EventData, _: &HdbEventDataType) -> BackendResult {
            Ok(())
        }

        fn insert_events(&mut self, _: Vec<(EventData, HdbEventDataType)>) -> BackendResult {
            Ok(())
        }

        fn insert_param_event(
            &mut self,
            _: &AttrConfEventData,
            _: &HdbEventDataType,
        ) -> BackendResult {
            Ok(())
        }

        fn add_attribute(
            &mut self,
            name: &str,
            data_type: i32,
            format: i32,
            write_type: i32,
        ) -> BackendResult {
            if self.fail_on.as_deref() == Some(name) {
                return Err(BackendError::new("duplicate attribute"));
            }
            self.calls
                .push(format!("add {} {} {} {}", name, data_type, format, write_type));
            Ok(())
        }

        fn update_ttl(&mut self, name: &str, ttl: u32) -> BackendResult {
            self.calls.push(format!("ttl {} {}", name, ttl));
            Ok(())
        }

        fn insert_history_event(&mut self, name: &str, event: u8) -> BackendResult {
            self.calls.push(format!("history {} {}", name, event));
            Ok(())
        }

        fn supported(&self, feature: HdbppFeature) -> bool {
            feature == HdbppFeature::Ttl && self.ttl
        }
    }

    fn spec(name: &str, ttl: Option<u32>) -> AttributeSpec {
        AttributeSpec {
            name: name.to_string(),
            data_type: 5,
            data_format: AttrDataFormat::Spectrum,
            write_type: 3,
            ttl,
        }
    }

    #[test]
    fn test_register_with_ttl() {
        let mut db = RecordingDb {
            ttl: true,
            ..Default::default()
        };

        let count = register_attributes(&mut db, &[spec("a/b/c/d", Some(48))]).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            db.calls,
            vec!["add a/b/c/d 5 1 3", "history a/b/c/d 7", "ttl a/b/c/d 48", "history a/b/c/d 6"]
        );
    }

    #[test]
    fn test_ttl_skipped_when_unsupported() {
        let mut db = RecordingDb::default();

        register_attributes(&mut db, &[spec("a/b/c/d", Some(48))]).unwrap();
        assert_eq!(db.calls, vec!["add a/b/c/d 5 1 3", "history a/b/c/d 7"]);
    }

    #[test]
    fn test_stops_at_first_error() {
        let mut db = RecordingDb {
            fail_on: Some("x/y/z/bad".to_string()),
            ..Default::default()
        };

        let result = register_attributes(
            &mut db,
            &[spec("x/y/z/good", None), spec("x/y/z/bad", None), spec("x/y/z/never", None)],
        );

        let err = result.unwrap_err();
        assert!(err.to_string().contains("x/y/z/bad"));
        let cause = err.downcast_ref::<BackendError>().unwrap();
        assert_eq!(cause.message(), "duplicate attribute");
        assert_eq!(db.calls.len(), 2);
    }
}
