//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# GymSync Configuration
# Only override what you want to change -- missing fields use defaults.
# Environment variables API_KEY, PORT, BACKEND_URL, DISCORD_ID and
# GYMSYNC_TITLE take precedence over this file.

[server]
# bind = "0.0.0.0"
# port = 3000
# api_key = ""             # required by gymsync-backend
# body_limit_bytes = 16384

[presence]
# backend_url = "https://gymsync-backend-orcin.vercel.app/api/v1/status"
# discord_id = ""          # required by gymsync-presence
# client_id = 1391871101734223912
# title = "GymSync"
# poll_interval_ms = 1000  # 100-60000
# request_timeout_secs = 5 # 1-120
# sink = "discord"         # discord, log
# button_label = "Check GymSync"
# button_url = "https://github.com/TheusHen/GymSync"

[logging]
# level = "info"           # trace, debug, info, warn, error
"##
    .to_string()
}
