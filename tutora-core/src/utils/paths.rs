//! Application-specific path resolution on top of the XDG base directories.
//!
//! All lookups go through the `directories-next` crate. Functions return
//! [`CoreError::Config(ConfigError::DirectoryUnavailable)`] when the platform
//! cannot provide a home directory, which is the only way these can fail.

use crate::error::{ConfigError, CoreError};
use directories_next::ProjectDirs;
use std::path::PathBuf;

const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "Tutora";
const APPLICATION: &str = "Tutora";

fn project_dirs() -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
        CoreError::Config(ConfigError::DirectoryUnavailable {
            dir_type: "Project".to_string(),
        })
    })
}

/// Returns the application configuration directory.
///
/// On Linux this is typically `~/.config/tutora`.
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Returns the application data directory, the default root for persisted
/// state blobs and log files.
///
/// On Linux this is typically `~/.local/share/tutora`.
pub fn get_app_data_dir() -> Result<PathBuf, CoreError> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_plausible(result: Result<PathBuf, CoreError>) {
        match result {
            Ok(path) => {
                assert!(path.is_absolute(), "expected absolute path, got {:?}", path);
                assert!(!path.as_os_str().is_empty());
            }
            // Environments without a home directory are a legitimate outcome.
            Err(CoreError::Config(ConfigError::DirectoryUnavailable { .. })) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn app_config_dir_is_absolute_when_available() {
        assert_plausible(get_app_config_dir());
    }

    #[test]
    fn app_data_dir_is_absolute_when_available() {
        assert_plausible(get_app_data_dir());
    }
}
