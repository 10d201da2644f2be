// Configuration loader with environment variable substitution

use super::types::*;
use crate::event::{WRITE_TYPE_READ, WRITE_TYPE_READ_WRITE};
use anyhow::{bail, Context, Result};
use regex::Regex;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file with environment variable substitution
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ClientConfig> {
        let content = std::fs::read_to_string(path.as_ref())
            .context("Failed to read config file")?;

        Self::parse(&content)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> Result<ClientConfig> {
        // Substitute environment variables
        let content = Self::substitute_env_vars(content)?;

        // Parse YAML
        let config: ClientConfig = serde_yaml::from_str(&content)
            .context("Failed to parse YAML configuration")?;

        // Validate configuration
        Self::validate(&config)?;

        Ok(config)
    }

    /// Substitute ${VAR} and ${VAR:-default} patterns with environment variables
    ///
    /// Examples:
    /// - ${HOME} -> /home/user
    /// - ${HDB_HOST:-localhost} -> localhost (if HDB_HOST not set)
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}:]+)(?::-([^}]+))?\}")
            .context("Invalid substitution pattern")?;

        Ok(re
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                let default_value = caps.get(2).map(|m| m.as_str());

                match std::env::var(var_name) {
                    Ok(value) => value,
                    Err(_) => {
                        if let Some(default) = default_value {
                            default.to_string()
                        } else {
                            // Keep original if no default and var not found
                            format!("${{{}}}", var_name)
                        }
                    }
                }
            })
            .to_string())
    }

    /// Validate configuration
    pub(crate) fn validate(config: &ClientConfig) -> Result<()> {
        if config.backend.id.is_empty() {
            bail!("backend.id cannot be empty");
        }

        // A missing libname is reported by the client itself
        if config.backend.libname() == Some("") {
            bail!("backend.configuration: 'libname' must name a library");
        }

        for attribute in &config.attributes {
            if attribute.name.is_empty() {
                bail!("attributes: name cannot be empty");
            }

            if !(WRITE_TYPE_READ..=WRITE_TYPE_READ_WRITE).contains(&attribute.write_type) {
                bail!(
                    "attributes: write_type of '{}' must be 0-3, got {}",
                    attribute.name,
                    attribute.write_type
                );
            }
        }

        match config.logging.format.as_str() {
            "text" | "json" => {}
            unknown => bail!("Unknown logging format: '{}'. Supported: text, json", unknown),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ClientConfig {
        let mut config = ClientConfig::default();
        config.backend.set_libname("libhdb++timescale.so");
        config
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("HDBPP_LOADER_TEST_VAR", "test_value");

        let input = "host: ${HDBPP_LOADER_TEST_VAR}";
        let output = ConfigLoader::substitute_env_vars(input).unwrap();
        assert_eq!(output, "host: test_value");

        std::env::remove_var("HDBPP_LOADER_TEST_VAR");
    }

    #[test]
    fn test_env_var_with_default() {
        std::env::remove_var("HDBPP_LOADER_TEST_VAR2");

        let input = "id: ${HDBPP_LOADER_TEST_VAR2:-sys/tg_test/1}";
        let output = ConfigLoader::substitute_env_vars(input).unwrap();
        assert_eq!(output, "id: sys/tg_test/1");
    }

    #[test]
    fn test_validation_accepts_minimal_config() {
        assert!(ConfigLoader::validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_validation_rejects_empty_libname() {
        let mut config = ClientConfig::default();
        config.backend.configuration.push("libname=".to_string());

        let result = ConfigLoader::validate(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("libname"));
    }

    #[test]
    fn test_validation_leaves_missing_libname_to_client() {
        assert!(ConfigLoader::validate(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_validation_invalid_write_type() {
        let mut config = valid_config();
        config.attributes.push(AttributeSpec {
            name: "sys/tg_test/1/double_scalar".to_string(),
            data_type: 5,
            data_format: Default::default(),
            write_type: 7,
            ttl: None,
        });

        let result = ConfigLoader::validate(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("write_type"));
    }

    #[test]
    fn test_validation_empty_id() {
        let mut config = valid_config();
        config.backend.id.clear();

        let result = ConfigLoader::validate(&config);
        assert!(result.unwrap_err().to_string().contains("backend.id"));
    }
}
