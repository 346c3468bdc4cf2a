//! `.env` loading and environment-variable overrides.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::schema::{normalize_title, GymSyncConfig};

/// Shared secret required on mutating backend calls.
pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_PORT: &str = "PORT";
pub const ENV_BACKEND_URL: &str = "BACKEND_URL";
pub const ENV_DISCORD_ID: &str = "DISCORD_ID";
pub const ENV_TITLE: &str = "GYMSYNC_TITLE";

/// Load environment variables from a `.env` file (KEY=VALUE lines).
///
/// Looks in the current directory first, then next to the config file.
/// Variables already present in the environment are never replaced.
pub fn load_dotenv(config_path: Option<&Path>) {
    let mut candidates = vec![PathBuf::from(".env")];
    if let Some(dir) = config_path.and_then(Path::parent) {
        candidates.push(dir.join(".env"));
    }

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for (key, value) in parse_dotenv(&contents) {
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
            debug!("loaded environment from {}", path.display());
            return;
        }
    }
}

fn parse_dotenv(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            (key.trim(), value)
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut GymSyncConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Apply overrides using `lookup` to resolve variable names.
///
/// The title is trimmed afterwards and falls back to the default when blank,
/// whether it came from the file or the environment.
pub fn apply_overrides<F>(config: &mut GymSyncConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_API_KEY) {
        config.server.api_key = key;
    }
    if let Some(port) = lookup(ENV_PORT) {
        match port.trim().parse() {
            Ok(port) => config.server.port = port,
            Err(e) => warn!("ignoring {ENV_PORT}={port:?}: {e}"),
        }
    }
    if let Some(url) = lookup(ENV_BACKEND_URL) {
        config.presence.backend_url = url;
    }
    if let Some(id) = lookup(ENV_DISCORD_ID) {
        config.presence.discord_id = id;
    }
    if let Some(title) = lookup(ENV_TITLE) {
        config.presence.title = title;
    }
    config.presence.title = normalize_title(&config.presence.title);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = GymSyncConfig::default();
        apply_overrides(
            &mut config,
            lookup(&[
                ("API_KEY", "test-key"),
                ("PORT", "8088"),
                ("BACKEND_URL", "http://localhost:8088/api/v1/status"),
                ("DISCORD_ID", "123456789"),
                ("GYMSYNC_TITLE", "Cardio"),
            ]),
        );
        assert_eq!(config.server.api_key, "test-key");
        assert_eq!(config.server.port, 8088);
        assert_eq!(
            config.presence.backend_url,
            "http://localhost:8088/api/v1/status"
        );
        assert_eq!(config.presence.discord_id, "123456789");
        assert_eq!(config.presence.title, "Cardio");
    }

    #[test]
    fn bad_port_is_ignored() {
        let mut config = GymSyncConfig::default();
        apply_overrides(&mut config, lookup(&[("PORT", "not-a-port")]));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn missing_vars_leave_config_untouched() {
        let mut config = GymSyncConfig::default();
        apply_overrides(&mut config, lookup(&[]));
        assert!(config.server.api_key.is_empty());
        assert_eq!(config.presence.title, "GymSync");
    }

    #[test]
    fn blank_title_falls_back_and_still_validates() {
        let mut config = GymSyncConfig::default();
        apply_overrides(&mut config, lookup(&[("GYMSYNC_TITLE", "   ")]));
        assert_eq!(config.presence.title, "GymSync");
        assert!(crate::validation::validate_presence(&config).is_ok());

        config.presence.title = "\t".into();
        apply_overrides(&mut config, lookup(&[]));
        assert_eq!(config.presence.title, "GymSync");
    }

    #[test]
    fn title_is_trimmed() {
        let mut config = GymSyncConfig::default();
        apply_overrides(&mut config, lookup(&[("GYMSYNC_TITLE", "  Cardio  ")]));
        assert_eq!(config.presence.title, "Cardio");
    }

    #[test]
    fn parse_dotenv_lines() {
        let parsed = parse_dotenv(
            "# comment\n\nAPI_KEY=\"abc\"\nBACKEND_URL = 'http://x'\nnot a pair\n=orphan\n",
        );
        assert_eq!(parsed, vec![("API_KEY", "abc"), ("BACKEND_URL", "http://x")]);
    }
}
