//! Configuration Module
//!
//! This module defines all configuration structures for the poll service.
//! Configuration is loaded from TOML files and parsed using serde.

use crate::validation::SigningDomain;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
///
/// Loaded from a TOML file (e.g., config/default.toml).
///
/// # Example TOML
/// ```toml
/// [api]
/// host = "127.0.0.1"
/// port = 3000
///
/// [events]
/// path = "config/events.json"
///
/// [signing]
/// name = "POAP.vote"
/// version = "1"
/// chainId = 1
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub events: EventsConfig,
    /// EIP-712 domain polls are signed under; every member is optional
    #[serde(default)]
    pub signing: SigningDomain,
}

/// API server configuration
///
/// # Fields
/// - `host`: IP address to bind to (e.g., "127.0.0.1" or "0.0.0.0")
/// - `port`: TCP port to listen on (e.g., 3000)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

/// Event catalog configuration
///
/// # Fields
/// - `path`: JSON file with the allow-listed events to start with. Without it
///   the catalog starts empty and is filled through `PUT /api/events`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsConfig {
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read or the TOML is invalid
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults_optional_sections() {
        let config = Config::parse("[api]\nhost = \"127.0.0.1\"\nport = 3000\n").unwrap();

        assert_eq!(config.api.port, 3000);
        assert!(config.events.path.is_none());
        assert_eq!(config.signing, SigningDomain::default());
    }

    #[test]
    fn test_signing_domain_is_read() {
        let config = Config::parse(
            r#"
            [api]
            host = "0.0.0.0"
            port = 8080

            [events]
            path = "config/events.json"

            [signing]
            name = "POAP.vote"
            version = "1"
            chainId = 1
            verifyingContract = "0x0000000000000000000000000000000000000001"
            "#,
        )
        .unwrap();

        assert_eq!(config.events.path, Some(PathBuf::from("config/events.json")));
        assert_eq!(config.signing.name.as_deref(), Some("POAP.vote"));
        assert_eq!(config.signing.chain_id, Some(1));
        assert!(config.signing.verifying_contract.is_some());
    }

    #[test]
    fn test_missing_api_section_is_an_error() {
        assert!(Config::parse("[events]\n").is_err());
    }
}
