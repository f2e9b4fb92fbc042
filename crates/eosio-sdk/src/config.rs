//! Network configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::SdkError;

/// Node connection settings, loadable from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetConfig {
    /// Node base URL
    #[serde(default = "default_url")]
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    crate::net::LOCAL_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl NetConfig {
    /// Config pointing at `url` with default timeout
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Parse from TOML text; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, SdkError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SdkError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, SdkError> {
        toml::to_string_pretty(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    /// Timeout as a duration
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = NetConfig::default();
        assert_eq!(config.url, "http://127.0.0.1:8888");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_config_partial_toml() {
        let config = NetConfig::from_toml_str(r#"url = "https://facings.waxpub.net""#).unwrap();
        assert_eq!(config.url, "https://facings.waxpub.net");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_config_round_trip() {
        let config = NetConfig {
            url: "https://testnet.waxsweden.org/".into(),
            timeout_secs: 5,
        };
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("timeout_secs"));
        assert_eq!(NetConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_config_bad_toml() {
        assert!(matches!(
            NetConfig::from_toml_str("timeout_secs = \"soon\""),
            Err(SdkError::Config(_))
        ));
    }

    #[test]
    fn test_config_missing_file() {
        assert!(matches!(
            NetConfig::load("/nonexistent/eosio-net.toml"),
            Err(SdkError::Config(_))
        ));
    }
}
