use std::fmt;

/// Severity of a log entry, lowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Wire-level detail (every signaling frame, every SDP body).
    Trace,
    /// Negotiation steps and media-engine notifications.
    Debug,
    /// Session lifecycle milestones.
    Info,
    /// Recoverable problems (a dropped send, an ignored frame).
    Warn,
    /// Failures that end a session.
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        f.write_str(s)
    }
}
