//! Application configuration.
//!
//! Defaults, optionally overridden by an `lre.toml` file. Command-line flags
//! are applied on top by the binary. The API key is never read from the file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::gemini::{GeminiConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::error::{LreError, LreResult};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "lre.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Gemini model name.
    pub model: String,
    /// Gemini API base URL.
    pub api_base: String,
    /// Request timeout in seconds; unset means no timeout.
    pub timeout_secs: Option<u64>,
    pub host: String,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: None,
            host: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

impl AppConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> LreResult<Self> {
        toml::from_str(s).map_err(|e| LreError::config(e.to_string()))
    }

    /// Load from `path`, or from `lre.toml` in the working directory if it
    /// exists, or fall back to defaults. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> LreResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default.to_path_buf()
            }
        };

        debug!(path = %path.display(), "Loading config");
        let content = std::fs::read_to_string(&path).map_err(|e| {
            LreError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Gemini client settings for the given credential.
    pub fn gemini(&self, api_key: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: api_key.to_string(),
            model: self.model.clone(),
            api_base: self.api_base.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_partial_file() {
        let config = AppConfig::from_toml_str("model = \"gemini-2.5-flash\"\nport = 8080\ntimeout_secs = 90\n").unwrap();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");

        let gemini = config.gemini("k");
        assert_eq!(gemini.api_key, "k");
        assert_eq!(gemini.timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = AppConfig::from_toml_str("api_key = \"secret\"").unwrap_err();
        assert!(matches!(err, LreError::Config(_)));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lre.toml");
        std::fs::write(&path, "host = \"0.0.0.0\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.host, "0.0.0.0");

        let missing = dir.path().join("missing.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }
}
