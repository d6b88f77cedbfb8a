//! Client configuration for reelsift: where the backend lives, how long to
//! wait for it and what to log.
//!
//! Configuration is resolved by [`ConfigLoader`] from an explicit path, the
//! `REELSIFT_CONFIG_PATH` / `REELSIFT_CONFIG_JSON` environment variables, a
//! default candidate file, or built-in defaults, in that order.
#![allow(missing_docs)]

pub mod error;
pub mod loader;
pub mod models;
pub mod sources;

pub use error::ConfigLoadError;
pub use loader::{ConfigLoad, ConfigLoader, ConfigSource};
pub use models::{BackendConfig, ClientConfig, LoggingConfig};
pub use sources::EnvConfig;
