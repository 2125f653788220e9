use std::sync::mpsc;

use crate::log::{log_level::LogLevel, log_msg::LogMsg, log_sink::LogSink};

/// Cloneable, non-blocking producer side of the [`Logger`](super::Logger) queue.
///
/// Every signaling thread, negotiation worker and media callback gets a clone
/// (usually as `Arc<dyn LogSink>`). When the queue is full the entry is dropped
/// rather than stalling the caller.
#[derive(Clone)]
pub struct LoggerHandle {
    pub(super) tx: mpsc::SyncSender<LogMsg>,
}

impl LogSink for LoggerHandle {
    #[inline]
    fn log(&self, level: LogLevel, msg: &str, target: &'static str) {
        let _ = self.try_log(level, msg, target);
    }
}

impl LoggerHandle {
    /// Enqueues one entry without blocking.
    ///
    /// # Errors
    /// `TrySendError::Full` when the queue is at capacity, `TrySendError::Disconnected`
    /// once the logger worker has exited.
    pub fn try_log<S: Into<String>>(
        &self,
        level: LogLevel,
        text: S,
        target: &'static str,
    ) -> Result<(), mpsc::TrySendError<LogMsg>> {
        self.tx.try_send(LogMsg::new(level, text, target))
    }
}
