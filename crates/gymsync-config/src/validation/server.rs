use crate::schema::GymSyncConfig;

use super::helpers::validate_range;

pub(crate) fn check_server(errors: &mut Vec<String>, config: &GymSyncConfig) {
    let server = &config.server;
    if server.port == 0 {
        errors.push("server.port must not be 0".into());
    }
    if server.bind.trim().is_empty() {
        errors.push("server.bind must not be empty".into());
    }
    validate_range(
        errors,
        "server.body_limit_bytes",
        server.body_limit_bytes as u64,
        256,
        1024 * 1024,
    );
}
