// Configuration module for hdbpp-client
//
// Provides:
// - `key=value` option list parsing shared with backends
// - YAML configuration file loading for the command line tool
// - Environment variable substitution and overrides
// - Configuration validation

mod loader;
pub mod options;
pub mod types;

pub use loader::ConfigLoader;
pub use options::{find_option, parse_options, LIBNAME_KEY, OPTION_SEPARATOR};
pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ClientConfig> {
    ConfigLoader::load(path).context("Failed to load configuration")
}

/// Load configuration with environment variable overrides
pub fn load_config_with_env<P: AsRef<Path>>(path: P) -> Result<ClientConfig> {
    let mut config = load_config(path)?;

    // Allow environment variables to override config values
    if let Ok(id) = std::env::var("HDBPP_ID") {
        config.backend.id = id;
    }

    if let Ok(libname) = std::env::var("HDBPP_LIBNAME") {
        config.backend.set_libname(&libname);
    }

    Ok(config)
}
