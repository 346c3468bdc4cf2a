//! Status backend configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP listener and credential settings for `gymsync-backend`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Shared secret expected as `Authorization: Bearer <api_key>` on
    /// mutating requests.
    pub api_key: String,
    /// Maximum accepted request body size.
    pub body_limit_bytes: usize,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind", &self.bind)
            .field("port", &self.port)
            .field("api_key", &"[REDACTED]")
            .field("body_limit_bytes", &self.body_limit_bytes)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 3000,
            api_key: String::new(),
            body_limit_bytes: 16 * 1024,
        }
    }
}

impl ServerConfig {
    /// `bind:port` for the TCP listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
