//! Leveled logging macros over any [`LogSink`](crate::log::LogSink).
//!
//! `sink_*!` takes an `Arc<dyn LogSink>` (or anything with a `log` method) and a
//! format string. Each level is compiled in only when its cargo feature
//! (`log-trace`, `log-debug`, `log-info`, `log-warn`, `log-error`) is enabled;
//! otherwise the macro only borrows its arguments inside a closure that never
//! runs, so they count as used but are never evaluated or formatted.
//! `logger_*!` are aliases kept for call sites that hold a `Logger`/`LoggerHandle`.

#[macro_export]
macro_rules! sink_log {
    ($sink:expr, $lvl:expr, $($arg:tt)*) => {{
        let __msg = format!($($arg)*);
        $sink.log($lvl, &__msg, module_path!());
    }};
}

#[macro_export]
macro_rules! logger_log {
    ($logger:expr, $lvl:expr, $($arg:tt)*) => {{
        let __msg = format!($($arg)*);
        $logger.log($lvl, &__msg, module_path!());
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! log_disabled {
    ($sink:expr, $($arg:tt)*) => {{
        let _ = || {
            let _ = &$sink;
            let _ = format_args!($($arg)*);
        };
    }};
}

// ---------------------- TRACE ----------------------
#[cfg(feature = "log-trace")]
#[macro_export]
macro_rules! sink_trace   { ($sink:expr, $($arg:tt)*)   => { $crate::sink_log!($sink, $crate::log::log_level::LogLevel::Trace, $($arg)*) } }
#[cfg(feature = "log-trace")]
#[macro_export]
macro_rules! logger_trace { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::log_level::LogLevel::Trace, $($arg)*) } }

#[cfg(not(feature = "log-trace"))]
#[macro_export]
macro_rules! sink_trace { ($($arg:tt)*) => { $crate::log_disabled!($($arg)*) }; }
#[cfg(not(feature = "log-trace"))]
#[macro_export]
macro_rules! logger_trace { ($($arg:tt)*) => { $crate::log_disabled!($($arg)*) }; }

// ---------------------- DEBUG ----------------------
#[cfg(feature = "log-debug")]
#[macro_export]
macro_rules! sink_debug   { ($sink:expr, $($arg:tt)*)   => { $crate::sink_log!($sink, $crate::log::log_level::LogLevel::Debug, $($arg)*) } }
#[cfg(feature = "log-debug")]
#[macro_export]
macro_rules! logger_debug { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::log_level::LogLevel::Debug, $($arg)*) } }

#[cfg(not(feature = "log-debug"))]
#[macro_export]
macro_rules! sink_debug { ($($arg:tt)*) => { $crate::log_disabled!($($arg)*) }; }
#[cfg(not(feature = "log-debug"))]
#[macro_export]
macro_rules! logger_debug { ($($arg:tt)*) => { $crate::log_disabled!($($arg)*) }; }

// ---------------------- INFO ----------------------
#[cfg(feature = "log-info")]
#[macro_export]
macro_rules! sink_info   { ($sink:expr, $($arg:tt)*)   => { $crate::sink_log!($sink, $crate::log::log_level::LogLevel::Info, $($arg)*) } }
#[cfg(feature = "log-info")]
#[macro_export]
macro_rules! logger_info { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::log_level::LogLevel::Info, $($arg)*) } }

#[cfg(not(feature = "log-info"))]
#[macro_export]
macro_rules! sink_info { ($($arg:tt)*) => { $crate::log_disabled!($($arg)*) }; }
#[cfg(not(feature = "log-info"))]
#[macro_export]
macro_rules! logger_info { ($($arg:tt)*) => { $crate::log_disabled!($($arg)*) }; }

// ---------------------- WARN ----------------------
#[cfg(feature = "log-warn")]
#[macro_export]
macro_rules! sink_warn   { ($sink:expr, $($arg:tt)*)   => { $crate::sink_log!($sink, $crate::log::log_level::LogLevel::Warn, $($arg)*) } }
#[cfg(feature = "log-warn")]
#[macro_export]
macro_rules! logger_warn { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::log_level::LogLevel::Warn, $($arg)*) } }

#[cfg(not(feature = "log-warn"))]
#[macro_export]
macro_rules! sink_warn { ($($arg:tt)*) => { $crate::log_disabled!($($arg)*) }; }
#[cfg(not(feature = "log-warn"))]
#[macro_export]
macro_rules! logger_warn { ($($arg:tt)*) => { $crate::log_disabled!($($arg)*) }; }

// ---------------------- ERROR ----------------------
#[cfg(feature = "log-error")]
#[macro_export]
macro_rules! sink_error   { ($sink:expr, $($arg:tt)*)   => { $crate::sink_log!($sink, $crate::log::log_level::LogLevel::Error, $($arg)*) } }
#[cfg(feature = "log-error")]
#[macro_export]
macro_rules! logger_error { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::log_level::LogLevel::Error, $($arg)*) } }

#[cfg(not(feature = "log-error"))]
#[macro_export]
macro_rules! sink_error { ($($arg:tt)*) => { $crate::log_disabled!($($arg)*) }; }
#[cfg(not(feature = "log-error"))]
#[macro_export]
macro_rules! logger_error { ($($arg:tt)*) => { $crate::log_disabled!($($arg)*) }; }

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use std::{
        fmt,
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use crate::log::{log_level::LogLevel, log_sink::LogSink};

    #[derive(Default)]
    struct Recording {
        lines: Mutex<Vec<(LogLevel, String)>>,
    }

    impl LogSink for Recording {
        fn log(&self, level: LogLevel, msg: &str, _target: &'static str) {
            self.lines.lock().unwrap().push((level, msg.to_owned()));
        }
    }

    struct Counted<'a>(&'a AtomicUsize);

    impl fmt::Display for Counted<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fetch_add(1, Ordering::SeqCst);
            f.write_str("x")
        }
    }

    #[test]
    fn disabled_levels_neither_log_nor_format() {
        let sink = Arc::new(Recording::default());
        let formatted = AtomicUsize::new(0);
        let arg = Counted(&formatted);

        crate::sink_trace!(sink, "trace {arg}");
        crate::sink_error!(sink, "error {arg}");

        let expected =
            usize::from(cfg!(feature = "log-trace")) + usize::from(cfg!(feature = "log-error"));
        assert_eq!(sink.lines.lock().unwrap().len(), expected);
        assert_eq!(formatted.load(Ordering::SeqCst), expected);
    }

    #[test]
    fn enabled_level_reaches_sink_with_message() {
        let sink = Arc::new(Recording::default());
        crate::sink_error!(sink, "failed after {} tries", 3);
        let lines = sink.lines.lock().unwrap();
        if cfg!(feature = "log-error") {
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0].1, "failed after 3 tries");
        } else {
            assert!(lines.is_empty());
        }
    }
}
