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

// `key=value` option lists handed to backends

use std::collections::HashMap;

/// Separator between key and value in an option entry
pub const OPTION_SEPARATOR: &str = "=";

/// Key naming the backend library to load
pub const LIBNAME_KEY: &str = "libname";

/// Parse a list of `key<separator>value` entries into a lookup table.
///
/// The key ends at the first occurrence of `separator`; the value is the
/// rest of the entry and may be empty. Entries without the separator, or
/// starting with it, are skipped. When a key repeats, the first entry wins.
pub fn parse_options(configuration: &[String], separator: &str) -> HashMap<String, String> {
    let mut options = HashMap::new();

    if separator.is_empty() {
        return options;
    }

    for item in configuration {
        if let Some(pos) = item.find(separator) {
            if pos > 0 {
                options
                    .entry(item[..pos].to_string())
                    .or_insert_with(|| item[pos + separator.len()..].to_string());
            }
        }
    }

    options
}

/// Look up a single option without building the full table
pub fn find_option<'a>(configuration: &'a [String], key: &str) -> Option<&'a str> {
    configuration.iter().find_map(|item| {
        item.split_once(OPTION_SEPARATOR)
            .filter(|(k, _)| !k.is_empty() && *k == key)
            .map(|(_, v)| v)
    })
}
