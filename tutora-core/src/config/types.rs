//! Configuration data structures for Tutora core.
//!
//! These structs are deserialized from `config.toml` via `serde`, with every
//! field falling back to a value from the [`super::defaults`] module so that
//! a missing or partial file still yields a complete configuration. Unknown
//! fields are rejected via `#[serde(deny_unknown_fields)]`.

use super::defaults;
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration of the logging subsystem.
///
/// Consumed by [`crate::logging::init_logging`].
///
/// # Examples
///
/// ```
/// use tutora_core::config::LoggingConfig;
///
/// let config = LoggingConfig::default();
/// assert_eq!(config.level, "info");
/// assert_eq!(config.file_path, None);
/// assert_eq!(config.format, "text");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level to record: "trace", "debug", "info", "warn" or "error"
    /// (case-insensitive, normalized during validation).
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the state
    /// directory during validation; `None` disables file logging.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// Output format: "text" or "json" (case-insensitive, normalized).
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Configuration of the local state store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding the persisted state blobs (`notifications.json`,
    /// `notification_rules.json`). `None` resolves to the platform data dir.
    #[serde(default = "defaults::default_data_dir")]
    pub data_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        defaults::default_storage_config()
    }
}

/// Root configuration for the Tutora core layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    /// `[logging]` section.
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    /// `[storage]` section.
    #[serde(default = "defaults::default_storage_config")]
    pub storage: StorageConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            logging: defaults::default_logging_config(),
            storage: defaults::default_storage_config(),
        }
    }
}
