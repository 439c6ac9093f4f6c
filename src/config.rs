//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::nutrition::MockFoodRecognizer;
use crate::storage::{StoreConfig, DEFAULT_STORAGE_KEY};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub recognition: RecognitionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Record store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_ms: u64,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("glucolog").to_string_lossy().to_string())
        .unwrap_or_else(|| "./glucolog_data".to_string())
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_operation_timeout() -> u64 {
    5000
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
            operation_timeout_ms: default_operation_timeout(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Food recognition configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionConfig {
    /// Simulated latency of the mock recognizer
    #[serde(default = "default_mock_latency")]
    pub mock_latency_ms: u64,

    /// Upper bound for one recognition call
    #[serde(default = "default_recognition_timeout")]
    pub timeout_ms: u64,
}

fn default_mock_latency() -> u64 {
    2000
}

fn default_recognition_timeout() -> u64 {
    10_000
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            mock_latency_ms: default_mock_latency(),
            timeout_ms: default_recognition_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Filter directive for `tracing_subscriber::EnvFilter`
    pub fn filter_directive(&self) -> String {
        format!("glucolog={},tower_http={}", self.level, self.level)
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("glucolog").join("config.toml")),
            Some(PathBuf::from("/etc/glucolog/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        // Fall back to environment-only config
        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Storage overrides
        if let Some(data_dir) = lookup("GLUCOLOG_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        // API overrides
        if let Some(host) = lookup("GLUCOLOG_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("GLUCOLOG_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!("Ignoring invalid GLUCOLOG_API_PORT: {}", port),
            }
        }

        // Logging overrides
        if let Some(level) = lookup("GLUCOLOG_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("GLUCOLOG_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Record store settings
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            data_dir: expand_home(&self.storage.data_dir),
            storage_key: self.storage.storage_key.clone(),
            operation_timeout_ms: self.storage.operation_timeout_ms,
        }
    }

    /// HTTP server settings
    pub fn api_config(&self) -> crate::api::ApiConfig {
        crate::api::ApiConfig {
            host: self.api.host.clone(),
            port: self.api.port,
            request_timeout_ms: self.api.request_timeout_secs * 1000,
            recognition_timeout_ms: self.recognition.timeout_ms,
            cors_origins: self.api.cors_origins.clone(),
            ..Default::default()
        }
    }

    /// The configured recognition backend
    pub fn recognizer(&self) -> MockFoodRecognizer {
        MockFoodRecognizer::new(Duration::from_millis(self.recognition.mock_latency_ms))
    }
}

/// Expand a leading `~/` to the user's home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Glucolog Configuration
#
# Environment variables override these settings:
# - GLUCOLOG_DATA_DIR
# - GLUCOLOG_API_HOST
# - GLUCOLOG_API_PORT
# - GLUCOLOG_LOG_LEVEL
# - GLUCOLOG_LOG_FORMAT

[storage]
# Directory holding the record file
data_dir = "~/.local/share/glucolog"

# Key the record collection is stored under
storage_key = "@blood_sugar_records"

# Upper bound for a storage read (ms); slower writes are logged and awaited
operation_timeout_ms = 5000

[api]
# API server host
host = "127.0.0.1"

# API server port
port = 8090

# Allowed CORS origins
cors_origins = []

# Request timeout in seconds
request_timeout_secs = 30

[recognition]
# Simulated latency of the mock food recognizer (ms)
mock_latency_ms = 2000

# Give up on a recognition call after this long (ms)
timeout_ms = 10000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/glucolog/glucolog.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();

        assert_eq!(config.storage.storage_key, "@blood_sugar_records");
        assert_eq!(config.storage.operation_timeout_ms, 5000);
        assert_eq!(config.api.port, 8090);
        assert_eq!(config.recognition.timeout_ms, 10_000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nport = 9999\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.port, 9999);
        assert_eq!(config.api.host, "127.0.0.1");
        assert_eq!(config.storage.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.recognition.mock_latency_ms, 2000);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempdir().unwrap();

        let missing = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));

        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[api\nport = ").unwrap();
        let bad = Config::load(&path).unwrap_err();
        assert!(matches!(bad, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("GLUCOLOG_DATA_DIR", "/tmp/glucolog"),
            ("GLUCOLOG_API_PORT", "not-a-port"),
            ("GLUCOLOG_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.storage.data_dir, "/tmp/glucolog");
        assert_eq!(config.api.port, 8090);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_derived_configs() {
        let mut config = Config::default();
        config.storage.data_dir = "/data".to_string();
        config.recognition.timeout_ms = 250;

        let store = config.store_config();
        assert_eq!(store.data_dir, PathBuf::from("/data"));
        assert_eq!(store.operation_timeout(), Duration::from_millis(5000));

        let mut home_config = Config::default();
        home_config.storage.data_dir = "~/glucose".to_string();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(home_config.store_config().data_dir, home.join("glucose"));
        }

        let api = config.api_config();
        assert_eq!(api.request_timeout_ms, 30_000);
        assert_eq!(api.recognition_timeout(), Duration::from_millis(250));
    }
}
