//! Reading `config.toml` from disk.
//!
//! An explicit path must exist. The platform default is seeded from a
//! commented template on first run and then read like any other file.

mod template;


use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use gymsync_common::ConfigError;
use tracing::info;

use crate::schema::GymSyncConfig;

/// `<platform config dir>/gymsync/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("gymsync").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Parse the file at `path`; absent keys keep their defaults.
///
/// Validation is left to the caller so environment overrides land first.
pub fn load_from_path(path: &Path) -> Result<GymSyncConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(ConfigError::ParseError(format!("{}: {e}", path.display()))),
    };

    let config = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Read the platform default file, seeding it from the template if absent.
pub fn load_default() -> Result<GymSyncConfig, ConfigError> {
    let path = default_config_path()?;
    if !path.exists() {
        write_template(&path)?;
    }
    load_from_path(&path)
}

/// Write the commented default config to `path`, creating parent dirs.
pub fn write_template(path: &Path) -> Result<(), ConfigError> {
    let io_error = |e: std::io::Error| ConfigError::ParseError(format!("{}: {e}", path.display()));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, template::default_config_toml()).map_err(io_error)?;
    info!(path = %path.display(), "wrote default config");
    Ok(())
}
