//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/geo-explorer/config.toml
//!
//! Credentials are checked once at startup through [`Config::credentials`];
//! a missing key and a known placeholder key are both "not configured".

pub mod defaults;

use crate::constants::{env as env_vars, placeholders};
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Map widget settings
    #[serde(default)]
    pub map: MapConfig,

    /// Gemini text generation settings
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Map widget settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Google Maps JavaScript API key (browser key)
    #[serde(default)]
    pub api_key: String,

    /// Map id used by the widget
    #[serde(default = "default_map_id")]
    pub map_id: String,

    #[serde(default = "default_initial_lat")]
    pub initial_lat: f64,

    #[serde(default = "default_initial_lng")]
    pub initial_lng: f64,

    #[serde(default = "default_initial_zoom")]
    pub initial_zoom: u8,
}

/// Gemini settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Gemini API key
    #[serde(default)]
    pub api_key: String,

    /// Model name, e.g. "gemini-2.5-flash"
    #[serde(default = "default_model")]
    pub model: String,

    /// API root, overridable for proxies and tests
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds, 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions for serde
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_map_id() -> String {
    DEFAULT_MAP_ID.to_string()
}
fn default_initial_lat() -> f64 {
    DEFAULT_INITIAL_LAT
}
fn default_initial_lng() -> f64 {
    DEFAULT_INITIAL_LNG
}
fn default_initial_zoom() -> u8 {
    DEFAULT_INITIAL_ZOOM
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_base_url() -> String {
    crate::constants::api::GEMINI_API_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            map_id: default_map_id(),
            initial_lat: default_initial_lat(),
            initial_lng: default_initial_lng(),
            initial_zoom: default_initial_zoom(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// State of a single credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialStatus {
    Configured,
    Missing,
    Placeholder,
}

impl CredentialStatus {
    /// Classify a credential value against its known placeholder
    pub fn check(value: &str, placeholder: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            Self::Missing
        } else if value == placeholder {
            Self::Placeholder
        } else {
            Self::Configured
        }
    }

    pub fn is_configured(self) -> bool {
        self == Self::Configured
    }
}

impl std::fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configured => write!(f, "configured"),
            Self::Missing => write!(f, "missing"),
            Self::Placeholder => write!(f, "placeholder"),
        }
    }
}

/// Startup credential check for both external services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub map: CredentialStatus,
    pub gemini: CredentialStatus,
}

impl Credentials {
    /// Both credentials usable
    pub fn all_configured(&self) -> bool {
        self.map.is_configured() && self.gemini.is_configured()
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Apply `GEMINI_API_KEY` / `GOOGLE_MAPS_API_KEY` from the environment
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_key_overrides(
            std::env::var(env_vars::GEMINI_API_KEY).ok(),
            std::env::var(env_vars::MAP_API_KEY).ok(),
        );
        self
    }

    /// Replace API keys with non-empty override values
    fn apply_key_overrides(&mut self, gemini: Option<String>, map: Option<String>) {
        if let Some(key) = gemini.filter(|k| !k.trim().is_empty()) {
            self.gemini.api_key = key;
        }
        if let Some(key) = map.filter(|k| !k.trim().is_empty()) {
            self.map.api_key = key;
        }
    }

    /// Check both credentials against their placeholders
    pub fn credentials(&self) -> Credentials {
        Credentials {
            map: CredentialStatus::check(&self.map.api_key, placeholders::MAP_API_KEY),
            gemini: CredentialStatus::check(&self.gemini.api_key, placeholders::GEMINI_API_KEY),
        }
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["map", "api_key"] => Some(self.map.api_key.clone()),
            ["map", "map_id"] => Some(self.map.map_id.clone()),
            ["map", "initial_lat"] => Some(self.map.initial_lat.to_string()),
            ["map", "initial_lng"] => Some(self.map.initial_lng.to_string()),
            ["map", "initial_zoom"] => Some(self.map.initial_zoom.to_string()),

            ["gemini", "api_key"] => Some(self.gemini.api_key.clone()),
            ["gemini", "model"] => Some(self.gemini.model.clone()),
            ["gemini", "base_url"] => Some(self.gemini.base_url.clone()),
            ["gemini", "timeout_secs"] => Some(self.gemini.timeout_secs.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            ["map", "api_key"] => {
                self.map.api_key = value.to_string();
            }
            ["map", "map_id"] => {
                self.map.map_id = value.to_string();
            }
            ["map", "initial_lat"] => {
                self.map.initial_lat = parse_degrees(value, 90.0)?;
            }
            ["map", "initial_lng"] => {
                self.map.initial_lng = parse_degrees(value, 180.0)?;
            }
            ["map", "initial_zoom"] => {
                self.map.initial_zoom = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid zoom value: {}", value))
                })?;
            }

            ["gemini", "api_key"] => {
                self.gemini.api_key = value.to_string();
            }
            ["gemini", "model"] => {
                self.gemini.model = value.to_string();
            }
            ["gemini", "base_url"] => {
                self.gemini.base_url = value.trim_end_matches('/').to_string();
            }
            ["gemini", "timeout_secs"] => {
                self.gemini.timeout_secs = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid timeout value: {}", value))
                })?;
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "server.host",
            "server.port",
            "map.api_key",
            "map.map_id",
            "map.initial_lat",
            "map.initial_lng",
            "map.initial_zoom",
            "gemini.api_key",
            "gemini.model",
            "gemini.base_url",
            "gemini.timeout_secs",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_degrees(value: &str, limit: f64) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() <= limit => Ok(v),
        _ => Err(Error::Config(format!(
            "Invalid coordinate value: {} (expected -{limit} to {limit})",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    fn with_temp_config<F: FnOnce()>(f: F) {
        let temp_dir = TempDir::new().unwrap();
        env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        f();
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.port, 7878);
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.map.initial_zoom, 2);
        assert_eq!(config.map.map_id, "GEOINFO_EXPLORER_MAP");
        assert!(config.map.api_key.is_empty());
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("gemini.model"), Some("gemini-2.5-flash".to_string()));

        config.set("gemini.model", "gemini-2.0-flash").unwrap();
        assert_eq!(config.get("gemini.model"), Some("gemini-2.0-flash".to_string()));

        config.set("map.initial_lat", "48.8566").unwrap();
        assert_eq!(config.map.initial_lat, 48.8566);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let mut config = Config::default();
        config.set("gemini.base_url", "http://localhost:9000/v1beta/").unwrap();
        assert_eq!(config.gemini.base_url, "http://localhost:9000/v1beta");
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("server.port", "not_a_number").is_err());
        assert!(config.set("map.initial_lat", "91").is_err());
        assert!(config.set("map.initial_lng", "NaN").is_err());
    }

    #[test]
    fn test_credentials_default_missing() {
        let credentials = Config::default().credentials();
        assert_eq!(credentials.map, CredentialStatus::Missing);
        assert_eq!(credentials.gemini, CredentialStatus::Missing);
        assert!(!credentials.all_configured());
    }

    #[test]
    fn test_credentials_placeholder_detected() {
        let mut config = Config::default();
        config.map.api_key = "YOUR_GOOGLE_MAPS_API_KEY".to_string();
        config.gemini.api_key = "YOUR_ACTUAL_GEMINI_API_KEY".to_string();

        let credentials = config.credentials();
        assert_eq!(credentials.map, CredentialStatus::Placeholder);
        assert_eq!(credentials.gemini, CredentialStatus::Placeholder);
        assert!(!credentials.map.is_configured());
    }

    #[test]
    fn test_credentials_configured() {
        let mut config = Config::default();
        config.map.api_key = "maps-key".to_string();
        config.gemini.api_key = "gemini-key".to_string();
        assert!(config.credentials().all_configured());
    }

    #[test]
    fn test_whitespace_key_is_missing() {
        assert_eq!(
            CredentialStatus::check("   ", placeholders::MAP_API_KEY),
            CredentialStatus::Missing
        );
    }

    #[test]
    fn test_key_overrides() {
        let mut config = Config::default();
        config.gemini.api_key = "from-file".to_string();

        config.apply_key_overrides(Some("from-env".to_string()), Some("".to_string()));

        assert_eq!(config.gemini.api_key, "from-env");
        assert!(config.map.api_key.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        with_temp_config(|| {
            let mut config = Config::default();
            config.gemini.model = "gemini-2.0-flash".to_string();
            config.server.port = 9000;
            config.save().unwrap();

            let loaded = Config::load().unwrap();
            assert_eq!(loaded.gemini.model, "gemini-2.0-flash");
            assert_eq!(loaded.server.port, 9000);
        });
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded: Config = toml::from_str("[gemini]\napi_key = \"abc\"\n").unwrap();
        assert_eq!(loaded.gemini.api_key, "abc");
        assert_eq!(loaded.gemini.model, "gemini-2.5-flash");
        assert_eq!(loaded.server.port, 7878);
    }

    #[test]
    fn test_serialization_format() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();

        assert!(toml.contains("[server]"));
        assert!(toml.contains("[map]"));
        assert!(toml.contains("[gemini]"));
    }

    #[test]
    fn test_server_addr() {
        assert_eq!(Config::default().server_addr(), "127.0.0.1:7878");
    }

    #[test]
    fn test_available_keys() {
        let keys = Config::available_keys();
        let config = Config::default();
        for key in &keys {
            assert!(config.get(key).is_some(), "key {} not readable", key);
        }
    }
}
