//! Configuration schema types for GymSync.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod presence;
mod server;

pub use logging::*;
pub use presence::*;
pub use server::*;

use serde::{Deserialize, Serialize};

/// Root configuration shared by the backend and the presence client.
///
/// Each binary reads only its own section; one file can serve both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GymSyncConfig {
    pub server: ServerConfig,
    pub presence: PresenceConfig,
    pub logging: LoggingConfig,
}
