//! Default configuration values.
//!
//! These functions back `serde`'s `default` attribute in the configuration
//! structures so that a missing file or a partially filled one always yields
//! a usable [`crate::config::CoreConfig`].

use crate::config::{LoggingConfig, StorageConfig};
use std::path::PathBuf;

/// Default `LoggingConfig`, used when the `[logging]` section is absent.
pub(super) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

/// Default log level (`"info"`).
pub(super) fn default_log_level() -> String {
    "info".to_string()
}

/// Default log file path (`None`, console only).
pub(super) fn default_log_file_path() -> Option<PathBuf> {
    None
}

/// Default log format (`"text"`).
pub(super) fn default_log_format() -> String {
    "text".to_string()
}

/// Default `StorageConfig`, used when the `[storage]` section is absent.
pub(super) fn default_storage_config() -> StorageConfig {
    StorageConfig {
        data_dir: default_data_dir(),
    }
}

/// Default state directory (`None`, resolved to the platform data dir).
pub(super) fn default_data_dir() -> Option<PathBuf> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_defaults() {
        let lc = default_logging_config();
        assert_eq!(lc.level, "info");
        assert_eq!(lc.file_path, None);
        assert_eq!(lc.format, "text");
    }

    #[test]
    fn storage_defaults() {
        let sc = default_storage_config();
        assert_eq!(sc.data_dir, None);
    }
}
