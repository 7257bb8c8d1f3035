//! Configuration loading and validation.
//!
//! [`ConfigLoader::load`] reads `config.toml` from the application config
//! directory; a missing file yields the compiled-in defaults, matching the
//! behavior of the rest of the platform where first-run state is always
//! synthesized rather than required. After parsing, the configuration is
//! validated and normalized: log level and format are lowercased and checked
//! against the accepted sets, and a relative log file path is resolved
//! against the state directory (creating parent directories as needed).

use std::fs;
use std::io;
use std::path::Path;

use crate::config::CoreConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::fs as core_fs;
use crate::utils::paths::{get_app_config_dir, get_app_data_dir};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Namespace struct for configuration loading logic.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates the configuration from the platform config dir.
    ///
    /// Reads `config.toml` under [`get_app_config_dir`]; if the file does not
    /// exist, the default configuration is used.
    pub fn load() -> Result<CoreConfig, CoreError> {
        let config_path = get_app_config_dir()?.join(CONFIG_FILE_NAME);
        Self::load_from_path(&config_path)
    }

    /// Loads and validates the configuration from an explicit path.
    ///
    /// A missing or empty file yields [`CoreConfig::default`]; any other read
    /// failure is an error.
    pub fn load_from_path(path: &Path) -> Result<CoreConfig, CoreError> {
        let mut config = match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => CoreConfig::default(),
            Ok(content) => toml::from_str(&content)
                .map_err(|e| CoreError::Config(ConfigError::ParseError(e)))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => CoreConfig::default(),
            Err(e) => {
                return Err(CoreError::Config(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    source: e,
                }))
            }
        };

        Self::validate_config(&mut config)?;
        Ok(config)
    }

    /// Validates the configuration in place, normalizing string fields and
    /// resolving the log file path.
    fn validate_config(config: &mut CoreConfig) -> Result<(), CoreError> {
        let level_lower = config.logging.level.to_lowercase();
        match level_lower.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {
                config.logging.level = level_lower;
            }
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    config.logging.level
                ))));
            }
        }

        let format_lower = config.logging.format.to_lowercase();
        match format_lower.as_str() {
            "text" | "json" => {
                config.logging.format = format_lower;
            }
            _ => {
                return Err(CoreError::Config(ConfigError::ValidationError(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    config.logging.format
                ))));
            }
        }

        if let Some(log_path) = &config.logging.file_path {
            let resolved = if log_path.is_absolute() {
                log_path.clone()
            } else {
                let state_dir = match &config.storage.data_dir {
                    Some(dir) => dir.clone(),
                    None => get_app_data_dir()?,
                };
                state_dir.join(log_path)
            };
            if let Some(parent) = resolved.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    core_fs::ensure_dir_exists(parent)?;
                }
            }
            config.logging.file_path = Some(resolved);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, content).expect("write temp config");
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let config = ConfigLoader::load_from_path(&path).expect("load failed");
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn empty_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "   \n");

        let config = ConfigLoader::load_from_path(&path).expect("load failed");
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn values_are_normalized() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
            [logging]
            level = "DEBUG"
            format = "JSON"
            "#,
        );

        let config = ConfigLoader::load_from_path(&path).expect("load failed");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn relative_log_path_resolves_against_data_dir() {
        let config_dir = tempdir().unwrap();
        let data_dir = tempdir().unwrap();
        let path = write_config(
            config_dir.path(),
            &format!(
                r#"
                [logging]
                file_path = "logs/engine.log"

                [storage]
                data_dir = "{}"
                "#,
                data_dir.path().display()
            ),
        );

        let config = ConfigLoader::load_from_path(&path).expect("load failed");
        let resolved = config.logging.file_path.expect("file path");
        assert!(resolved.is_absolute());
        assert!(resolved.starts_with(data_dir.path()));
        assert!(resolved.parent().unwrap().exists(), "log parent dir not created");
    }

    #[test]
    fn invalid_level_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
            [logging]
            level = "loud"
            "#,
        );

        let result = ConfigLoader::load_from_path(&path);
        match result {
            Err(CoreError::Config(ConfigError::ValidationError(msg))) => {
                assert!(msg.contains("Invalid log level: 'loud'"));
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn invalid_format_is_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
            [logging]
            format = "binary"
            "#,
        );

        let result = ConfigLoader::load_from_path(&path);
        match result {
            Err(CoreError::Config(ConfigError::ValidationError(msg))) => {
                assert!(msg.contains("Invalid log format: 'binary'"));
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn parse_error_is_reported() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "this is not valid toml");

        let result = ConfigLoader::load_from_path(&path);
        assert!(matches!(
            result,
            Err(CoreError::Config(ConfigError::ParseError(_)))
        ));
    }
}
