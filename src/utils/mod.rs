//! Configuration utilities

pub mod config;

pub use config::{validate_config, validate_fov, ConfigError, ConfigurationManager, OverlayStyle, SkyConfig, ValidationResult};
