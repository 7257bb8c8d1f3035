//! Configuration management for the Tutora core layer.
//!
//! - [`types`] defines the configuration schema ([`CoreConfig`],
//!   [`LoggingConfig`], [`StorageConfig`]).
//! - [`defaults`] provides per-field fallback values.
//! - [`loader`] implements loading and validation ([`ConfigLoader`]).
//!
//! `ConfigLoader::load()` reads `config.toml` from the application config
//! directory, substitutes defaults for anything missing, and validates the
//! result. A completely absent file is not an error.

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{CoreConfig, LoggingConfig, StorageConfig};
