use crate::schema::GymSyncConfig;

use super::helpers::{validate_http_url, validate_label, validate_range};

pub(crate) fn check_presence(errors: &mut Vec<String>, config: &GymSyncConfig) {
    let presence = &config.presence;
    validate_range(
        errors,
        "presence.poll_interval_ms",
        presence.poll_interval_ms,
        100,
        60_000,
    );
    validate_range(
        errors,
        "presence.request_timeout_secs",
        presence.request_timeout_secs,
        1,
        120,
    );
    validate_http_url(errors, "presence.backend_url", &presence.backend_url);
    validate_http_url(errors, "presence.button_url", &presence.button_url);
    validate_label(errors, "presence.title", &presence.title, 128);
    validate_label(errors, "presence.button_label", &presence.button_label, 32);
    if presence.client_id <= 0 {
        errors.push(format!(
            "presence.client_id = {} must be positive",
            presence.client_id
        ));
    }
}
