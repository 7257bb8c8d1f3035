//! Error handling for the Tutora core layer.
//!
//! All fallible operations in this crate return [`CoreError`] or one of the
//! more specific enums it wraps ([`ConfigError`], [`StateError`]). The types
//! are defined with `thiserror` so that callers get readable messages and an
//! intact `source()` chain.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for the Tutora platform.
///
/// Used as the common error currency of the infrastructure layer; the
/// domain layer wraps it where it needs to add context.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Errors related to configuration loading, parsing, or validation.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors that occur while initializing the logging system.
    #[error("Logging Initialization Failed: {0}")]
    LoggingInitialization(String),

    /// Errors from the keyed state store.
    #[error("State Storage Error: {0}")]
    State(#[from] StateError),

    /// Filesystem operations outside of configuration and state storage,
    /// such as directory creation.
    #[error("Filesystem Error: {message} (Path: {path:?})")]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// General I/O errors not covered by a more specific variant.
    #[error("I/O Error: {0}")]
    Io(#[from] io::Error),

    /// Catch-all for unexpected internal errors within the core library.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl CoreError {
    /// True when the error means "no state blob exists under that key".
    ///
    /// Persistence providers treat this case as "first run" and fall back to
    /// their compiled-in defaults instead of failing.
    pub fn is_state_not_found(&self) -> bool {
        matches!(self, CoreError::State(StateError::NotFound { .. }))
    }
}

/// Error type for configuration loading and validation.
///
/// Typically wrapped by [`CoreError::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::CoreConfig`].
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The file parsed but carries values that fail validation.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// A required base directory (XDG config/data home) could not be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Error type for the keyed state store.
///
/// Keys are logical blob names like `notifications.json`; the store decides
/// where they live on disk.
#[derive(Debug, Error)]
pub enum StateError {
    /// No blob has ever been written under this key.
    #[error("No state stored under key '{key}'")]
    NotFound { key: String },

    /// Reading the blob failed for a reason other than absence.
    #[error("Failed to read state under key '{key}'")]
    ReadError {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Writing the blob failed.
    #[error("Failed to write state under key '{key}'")]
    WriteError {
        key: String,
        #[source]
        source: io::Error,
    },

    /// A key escaped the store root or is otherwise not usable as a file name.
    #[error("Invalid state key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn core_error_config_variant_carries_source() {
        let config_err = ConfigError::ValidationError("level must name a tracing level".to_string());
        let core_err = CoreError::Config(config_err);

        assert_eq!(
            format!("{}", core_err),
            "Configuration Error: Configuration validation failed: level must name a tracing level"
        );
        assert!(core_err.source().is_some());
    }

    #[test]
    fn core_error_filesystem_variant_formats_path() {
        let path = PathBuf::from("/var/lib/tutora");
        let core_err = CoreError::Filesystem {
            message: "Could not create data directory".to_string(),
            path: path.clone(),
            source: IoError::new(ErrorKind::PermissionDenied, "denied"),
        };

        assert_eq!(
            format!("{}", core_err),
            format!("Filesystem Error: Could not create data directory (Path: {:?})", path)
        );
        assert_eq!(
            core_err
                .source()
                .unwrap()
                .downcast_ref::<IoError>()
                .unwrap()
                .kind(),
            ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn state_not_found_is_recognized_through_core_error() {
        let err = CoreError::State(StateError::NotFound {
            key: "notifications.json".to_string(),
        });
        assert!(err.is_state_not_found());

        let other = CoreError::State(StateError::ReadError {
            key: "notifications.json".to_string(),
            source: IoError::new(ErrorKind::PermissionDenied, "denied"),
        });
        assert!(!other.is_state_not_found());
        assert!(!CoreError::Internal("boom".to_string()).is_state_not_found());
    }

    #[test]
    fn config_parse_error_wraps_toml_error() {
        let toml_err: toml::de::Error =
            toml::from_str::<crate::config::CoreConfig>("this is not valid toml").unwrap_err();
        let display = format!("{}", toml_err);

        let config_err = ConfigError::ParseError(toml_err);
        assert_eq!(
            format!("{}", config_err),
            format!("Failed to parse configuration file: {}", display)
        );
        assert!(config_err.source().unwrap().is::<toml::de::Error>());
    }

    #[test]
    fn state_error_messages_name_the_key() {
        let err = StateError::WriteError {
            key: "notification_rules.json".to_string(),
            source: IoError::new(ErrorKind::Other, "disk full"),
        };
        assert_eq!(
            format!("{}", err),
            "Failed to write state under key 'notification_rules.json'"
        );
        assert!(err.source().is_some());
    }
}
