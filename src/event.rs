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

// Event and attribute types handed through to archiving backends
//
// The client never looks inside these; they exist so that the backend
// interface has concrete, serializable types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// History event codes understood by archiving backends
pub const DB_INSERT: u8 = 0;
pub const DB_START: u8 = 1;
pub const DB_STOP: u8 = 2;
pub const DB_REMOVE: u8 = 3;
pub const DB_INSERT_PARAM: u8 = 4;
pub const DB_PAUSE: u8 = 5;
pub const DB_UPDATETTL: u8 = 6;
pub const DB_ADD: u8 = 7;

/// Attribute write types (Tango `AttrWriteType`)
pub const WRITE_TYPE_READ: i32 = 0;
pub const WRITE_TYPE_READ_WITH_WRITE: i32 = 1;
pub const WRITE_TYPE_WRITE: i32 = 2;
pub const WRITE_TYPE_READ_WRITE: i32 = 3;

/// Optional backend features that can be queried with `supported`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HdbppFeature {
    Ttl,
    BatchInserts,
}

impl HdbppFeature {
    pub const ALL: [HdbppFeature; 2] = [HdbppFeature::Ttl, HdbppFeature::BatchInserts];

    pub fn as_str(self) -> &'static str {
        match self {
            HdbppFeature::Ttl => "ttl",
            HdbppFeature::BatchInserts => "batch_inserts",
        }
    }
}

/// Named view of the history event codes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HistoryEvent {
    Insert = 0,
    Start = 1,
    Stop = 2,
    Remove = 3,
    InsertParam = 4,
    Pause = 5,
    UpdateTtl = 6,
    Add = 7,
}

impl HistoryEvent {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for HistoryEvent {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            DB_INSERT => Ok(HistoryEvent::Insert),
            DB_START => Ok(HistoryEvent::Start),
            DB_STOP => Ok(HistoryEvent::Stop),
            DB_REMOVE => Ok(HistoryEvent::Remove),
            DB_INSERT_PARAM => Ok(HistoryEvent::InsertParam),
            DB_PAUSE => Ok(HistoryEvent::Pause),
            DB_UPDATETTL => Ok(HistoryEvent::UpdateTtl),
            DB_ADD => Ok(HistoryEvent::Add),
            other => Err(other),
        }
    }
}

/// Attribute data format (Tango `AttrDataFormat`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttrDataFormat {
    #[default]
    Scalar = 0,
    Spectrum = 1,
    Image = 2,
    FmtUnknown = 3,
}

impl AttrDataFormat {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Attribute quality factor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttrQuality {
    #[default]
    Valid,
    Invalid,
    Alarm,
    Changing,
    Warning,
}

/// Value carried by an attribute event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub quality: AttrQuality,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub dim_x: i32,
    #[serde(default)]
    pub dim_y: i32,
    pub value: serde_json::Value,
}

/// Attribute change/periodic/archive event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    pub attr_name: String,
    /// Event kind, e.g. "archive" or "change"
    pub event: String,
    pub reception_date: DateTime<Utc>,
    #[serde(default)]
    pub err: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attr_value: Option<AttributeValue>,
}

/// Static attribute configuration as reported by the control system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub name: String,
    pub data_type: i32,
    pub data_format: AttrDataFormat,
    pub writable: i32,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
}

/// Attribute configuration change event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttrConfEventData {
    pub attr_name: String,
    pub event: String,
    pub reception_date: DateTime<Utc>,
    #[serde(default)]
    pub err: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attr_conf: Option<AttributeInfo>,
}

/// Type description that accompanies every event sent to a backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HdbEventDataType {
    pub attr_name: String,
    pub max_dim_x: i32,
    pub max_dim_y: i32,
    pub data_type: i32,
    pub data_format: AttrDataFormat,
    pub write_type: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_event_codes() {
        assert_eq!(HistoryEvent::Add.code(), DB_ADD);
        assert_eq!(HistoryEvent::UpdateTtl.code(), DB_UPDATETTL);
        assert_eq!(HistoryEvent::try_from(DB_PAUSE), Ok(HistoryEvent::Pause));
        assert_eq!(HistoryEvent::try_from(42), Err(42));
    }

    #[test]
    fn test_data_format_codes() {
        assert_eq!(AttrDataFormat::Scalar.code(), 0);
        assert_eq!(AttrDataFormat::Image.code(), 2);
        assert_eq!(AttrDataFormat::default(), AttrDataFormat::Scalar);
    }

    #[test]
    fn test_feature_names() {
        assert_eq!(HdbppFeature::Ttl.as_str(), "ttl");
        let json = serde_json::to_string(&HdbppFeature::BatchInserts).unwrap();
        assert_eq!(json, "\"batch_inserts\"");
    }
}
