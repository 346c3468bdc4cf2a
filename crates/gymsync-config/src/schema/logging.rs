use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `EnvFilter` directive covering every `gymsync_*` target.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "gymsync=trace",
            LogLevel::Debug => "gymsync=debug",
            LogLevel::Info => "gymsync=info",
            LogLevel::Warn => "gymsync=warn",
            LogLevel::Error => "gymsync=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
