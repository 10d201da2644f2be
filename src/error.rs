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

// Errors raised while building a client around a backend library

use thiserror::Error;

/// Failure categories of client construction.
///
/// Once a client is built no error originates from this crate; failures of
/// forwarded operations come from the backend itself.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A required configuration key is absent.
    #[error("Configuration parsing error looking for key '{key}'")]
    MissingKey { key: String },

    /// The dynamic loader could not open the library.
    #[error("Error loading library: {libname}. Error report: {source}")]
    Load {
        libname: String,
        #[source]
        source: libloading::Error,
    },

    /// The library does not provide a usable factory entry point.
    #[error("Error loading symbol {symbol} from library: {libname} ({reason})")]
    Symbol {
        symbol: String,
        libname: String,
        reason: String,
    },

    /// The backend factory returned no database object.
    #[error("Error creating db (library: {libname})")]
    CreateDb { libname: String },
}

impl ClientError {
    /// Library implicated in the failure, if any
    pub fn libname(&self) -> Option<&str> {
        match self {
            ClientError::MissingKey { .. } => None,
            ClientError::Load { libname, .. }
            | ClientError::Symbol { libname, .. }
            | ClientError::CreateDb { libname } => Some(libname),
        }
    }
}

/// Error returned by a backend operation
///
/// Plain owned data: it holds no trait object, so no code from the backend
/// library is needed to display or drop it after the library is unloaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
    /// Underlying causes, outermost first
    chain: Vec<String>,
}

/// Result of a forwarded backend operation
pub type BackendResult<T = ()> = Result<T, BackendError>;

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            chain: Vec::new(),
        }
    }

    /// Append an underlying cause
    pub fn caused_by(mut self, cause: impl Into<String>) -> Self {
        self.chain.push(cause.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn chain(&self) -> &[String] {
        &self.chain
    }
}

// Flattens the error into strings so `?` on anyhow errors works in backends
impl From<anyhow::Error> for BackendError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            message: err.to_string(),
            chain: err.chain().skip(1).map(|cause| cause.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_backend_error_from_anyhow() {
        let result = Err::<(), _>(anyhow::anyhow!("connection refused"))
            .context("insert failed")
            .context("cannot archive a/b/c/d");

        let err = BackendError::from(result.unwrap_err());
        assert_eq!(err.message(), "cannot archive a/b/c/d");
        assert_eq!(err.chain(), ["insert failed", "connection refused"]);
        assert_eq!(err.to_string(), "cannot archive a/b/c/d");
    }

    #[test]
    fn test_backend_error_caused_by() {
        let err = BackendError::new("ttl rejected").caused_by("table missing");
        assert_eq!(err.chain(), ["table missing"]);
    }

    #[test]
    fn test_missing_key_display() {
        let err = ClientError::MissingKey {
            key: "libname".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Configuration parsing error looking for key 'libname'"
        );
        assert!(err.libname().is_none());
    }

    #[test]
    fn test_symbol_display() {
        let err = ClientError::Symbol {
            symbol: "getDBFactory".to_string(),
            libname: "libfoo.so".to_string(),
            reason: "undefined symbol".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Error loading symbol getDBFactory"));
        assert!(msg.contains("libfoo.so"));
        assert_eq!(err.libname(), Some("libfoo.so"));
    }

    #[test]
    fn test_create_db_display() {
        let err = ClientError::CreateDb {
            libname: "libhdb++timescale.so".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error creating db (library: libhdb++timescale.so)"
        );
    }
}
