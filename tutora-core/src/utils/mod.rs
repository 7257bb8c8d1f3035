//! General utilities for the Tutora core layer.
//!
//! # Submodules
//!
//! - [`fs`]: filesystem helpers returning [`crate::error::CoreError`].
//! - [`paths`]: XDG-based resolution of the application config and data
//!   directories.

pub mod fs;
pub mod paths;

pub use fs::{ensure_dir_exists, read_to_string};
