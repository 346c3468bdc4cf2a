//! GymSync configuration system.
//!
//! TOML-based configuration shared by the status backend and the desktop
//! presence client. All sections use sensible defaults so partial configs
//! work out of the box; environment variables override the file.

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    normalize_title, GymSyncConfig, LogLevel, LoggingConfig, PresenceConfig, ServerConfig,
    SinkKind, DEFAULT_TITLE,
};

use gymsync_common::ConfigError;
use std::path::Path;

/// Load config for `gymsync-backend`; only `[server]` is validated.
pub fn load_backend_config(path: Option<&Path>) -> Result<GymSyncConfig, ConfigError> {
    let config = load_with_env(path)?;
    validation::validate_server(&config)?;
    Ok(config)
}

/// Load config for `gymsync-presence`; only `[presence]` is validated.
pub fn load_presence_config(path: Option<&Path>) -> Result<GymSyncConfig, ConfigError> {
    let config = load_with_env(path)?;
    validation::validate_presence(&config)?;
    Ok(config)
}

/// Read `path` when given, otherwise the platform default (created on first
/// run), then apply environment overrides.
fn load_with_env(path: Option<&Path>) -> Result<GymSyncConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    env::apply_env_overrides(&mut config);
    Ok(config)
}
