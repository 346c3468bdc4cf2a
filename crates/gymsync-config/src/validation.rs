//! Configuration validation.
//!
//! Each binary validates only the sections it reads, so a mistake in the
//! presence section never stops the backend and vice versa. Errors within a
//! section are collected into a single `ConfigError`.

mod helpers;
mod presence;
mod server;


use crate::schema::GymSyncConfig;
use gymsync_common::ConfigError;

/// Validate the `[server]` section.
pub fn validate_server(config: &GymSyncConfig) -> Result<(), ConfigError> {
    collect(|errors| server::check_server(errors, config))
}

/// Validate the `[presence]` section.
pub fn validate_presence(config: &GymSyncConfig) -> Result<(), ConfigError> {
    collect(|errors| presence::check_presence(errors, config))
}

fn collect(check: impl FnOnce(&mut Vec<String>)) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    check(&mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
