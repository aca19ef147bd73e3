//! pfd-config
//!
//! Persistent analytics preferences.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{ConfigBackup, ConfigManager};
pub use model::{resolve_base_dir, Config, BASE_DIR_ENV};
