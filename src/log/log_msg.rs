use std::time::{SystemTime, UNIX_EPOCH};

use crate::log::log_level::LogLevel;

/// One queued log entry.
#[derive(Debug, Clone)]
pub struct LogMsg {
    pub level: LogLevel,
    /// Milliseconds since the UNIX epoch.
    pub ts_ms: u128,
    pub text: String,
    /// Module path of the call site.
    pub target: &'static str,
}

impl LogMsg {
    pub fn new(level: LogLevel, text: impl Into<String>, target: &'static str) -> Self {
        Self {
            level,
            ts_ms: now_millis(),
            text: text.into(),
            target,
        }
    }

    /// Renders the entry as a single file line (no trailing newline).
    #[must_use]
    pub fn to_line(&self) -> String {
        format!(
            "[{}] {} {} | {}",
            self.level, self.ts_ms, self.target, self.text
        )
    }
}

/// Wall-clock milliseconds, `0` if the clock is before the epoch.
#[must_use]
pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
