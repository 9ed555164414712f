//! Configuration for padlaunch.
//!
//! Read once at startup from `<settings dir>/config.toml`. The settings
//! directory is `-settingsDir=` when given, else the platform config dir.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, InstanceConfig, LocalizationConfig};
