//! # Tutora Core Library (`tutora-core`)
//!
//! `tutora-core` is the infrastructure layer of the Tutora platform. It
//! provides the services the domain crates build on:
//!
//! - **Error handling**: the [`CoreError`] taxonomy with specific
//!   [`ConfigError`] and [`StateError`] enums.
//! - **Configuration**: TOML-based loading with defaults and validation via
//!   [`ConfigLoader`] and [`CoreConfig`].
//! - **Logging**: a `tracing`-based setup with console and optional rolling
//!   file output, see [`logging`].
//! - **State storage**: the [`StateStoreAsync`] keyed blob store with
//!   filesystem and in-memory implementations, see [`storage`].
//! - **Utilities**: filesystem and path helpers under [`utils`].
//!
//! ```rust,ignore
//! use tutora_core::config::ConfigLoader;
//! use tutora_core::error::CoreError;
//! use tutora_core::logging;
//!
//! fn main() -> Result<(), CoreError> {
//!     let config = ConfigLoader::load()?;
//!     logging::init_logging(&config.logging)?;
//!     tracing::info!("Tutora core initialized");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod storage;
pub mod utils;

pub use config::{ConfigLoader, CoreConfig, LoggingConfig, StorageConfig};
pub use error::{ConfigError, CoreError, StateError};
pub use logging::{init_logging, init_minimal_logging};
pub use storage::{FilesystemStateStore, InMemoryStateStore, StateStoreAsync};
