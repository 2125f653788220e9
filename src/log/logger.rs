use crate::{
    config::Config,
    log::{log_level::LogLevel, log_msg::LogMsg, logger_handle::LoggerHandle},
};

use std::{
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::mpsc::{self, TrySendError},
    thread,
    time::{SystemTime, UNIX_EPOCH},
};

#[cfg(feature = "log-debug")]
const FLUSH_BATCH_SIZE: u32 = 50;

#[cfg(not(feature = "log-debug"))]
const FLUSH_BATCH_SIZE: u32 = 500;

/// Default queue sizes used by [`Logger::start_client`].
const DEFAULT_CAP: usize = 4_096;
const DEFAULT_UI_CAP: usize = 256;
const DEFAULT_SAMPLE_EVERY: u32 = 10;

/// Bounded, non-blocking file logger.
///
/// Producers enqueue through [`LoggerHandle`]; a `logger-worker` thread appends
/// lines to a per-process file and forwards a sample (every Warn/Error, one in
/// `sample_every` of the rest) to a small UI queue for a status view.
pub struct Logger {
    handle: LoggerHandle,
    ui_log_rx: mpsc::Receiver<String>,
    _thread: Option<thread::JoinHandle<()>>,
    file_path: PathBuf,
}

impl Logger {
    /// Starts the client logger using `[Logging] client_log_path` and
    /// `client_log_filename`, defaulting to `logs/` next to the executable.
    #[must_use]
    pub fn start_client(config: &Config) -> Self {
        let app_name = config
            .get_non_empty("Logging", "client_log_filename")
            .or(Some("roomlink"));

        let dir = config
            .get_non_empty("Logging", "client_log_path")
            .map_or_else(|| exe_dir_fallback_cwd().join("logs"), expand_path);

        Self::start_in_dir(
            dir,
            app_name,
            DEFAULT_CAP,
            DEFAULT_UI_CAP,
            DEFAULT_SAMPLE_EVERY,
        )
    }

    /// Starts the logger writing into `dir`, creating it if needed.
    ///
    /// The file is named `<app_name>-<unix secs>-pid<pid>.log`. If the file
    /// cannot be opened the worker falls back to a temp-dir file, then to
    /// `io::sink()`; it never panics.
    pub fn start_in_dir<D: AsRef<Path>>(
        dir: D,
        app_name: Option<&str>,
        cap: usize,
        ui_cap: usize,
        sample_every: u32,
    ) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let _ = fs::create_dir_all(&dir);

        let sample_every = sample_every.max(1);
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let pid = std::process::id();
        let fname = match app_name {
            Some(name) => format!("{name}-{secs}-pid{pid}.log"),
            None => format!("{secs}-pid{pid}.log"),
        };
        let file_path = dir.join(fname);

        let (tx, rx) = mpsc::sync_channel::<LogMsg>(cap);
        let (ui_tx, ui_rx) = mpsc::sync_channel::<String>(ui_cap);

        let worker_path = file_path.clone();
        let _thread = thread::Builder::new()
            .name("logger-worker".into())
            .spawn(move || run_worker(&worker_path, &rx, &ui_tx, sample_every))
            .ok();

        Self {
            handle: LoggerHandle { tx },
            ui_log_rx: ui_rx,
            _thread,
            file_path,
        }
    }

    /// Enqueues one entry without blocking; see [`LoggerHandle::try_log`].
    ///
    /// # Errors
    /// Returns the rejected message when the queue is full or the worker is gone.
    pub fn try_log<S: Into<String>>(
        &self,
        level: LogLevel,
        text: S,
        target: &'static str,
    ) -> Result<(), TrySendError<LogMsg>> {
        self.handle.try_log(level, text, target)
    }

    #[must_use]
    pub fn handle(&self) -> LoggerHandle {
        self.handle.clone()
    }

    /// Pops one sampled line for on-screen display, if any.
    #[must_use]
    pub fn try_recv_ui(&self) -> Option<String> {
        self.ui_log_rx.try_recv().ok()
    }

    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

fn run_worker(
    path: &Path,
    rx: &mpsc::Receiver<LogMsg>,
    ui_tx: &mpsc::SyncSender<String>,
    sample_every: u32,
) {
    let writer: Box<dyn Write + Send> =
        if let Ok(f) = OpenOptions::new().create(true).append(true).open(path) {
            Box::new(f)
        } else {
            let fallback = std::env::temp_dir().join("roomlink-fallback.log");
            match OpenOptions::new().create(true).append(true).open(&fallback) {
                Ok(f) => Box::new(f),
                Err(_) => Box::new(io::sink()),
            }
        };
    let mut out = BufWriter::new(writer);

    let mut sampled: u32 = 0;
    let mut lines_written: u32 = 0;
    let mut dropped_to_ui: usize = 0;

    while let Ok(m) = rx.recv() {
        let _ = writeln!(&mut out, "{}", m.to_line());
        lines_written = lines_written.wrapping_add(1);
        if lines_written.is_multiple_of(FLUSH_BATCH_SIZE) || m.level == LogLevel::Error {
            let _ = out.flush();
        }

        let forward = matches!(m.level, LogLevel::Warn | LogLevel::Error) || {
            sampled = sampled.wrapping_add(1);
            sampled.is_multiple_of(sample_every)
        };
        if forward && ui_tx.try_send(format!("[{}] {}", m.level, m.text)).is_err() {
            dropped_to_ui += 1;
        }
        if dropped_to_ui >= 10
            && ui_tx
                .try_send(format!("(logger) UI log queue dropped {dropped_to_ui} lines"))
                .is_ok()
        {
            dropped_to_ui = 0;
        }
    }

    let _ = out.flush();
}

fn exe_dir_fallback_cwd() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Expands a leading `~` to the user's home directory.
fn expand_path(path_str: &str) -> PathBuf {
    let home = || {
        std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()
            .map(PathBuf::from)
    };
    if path_str == "~" {
        if let Some(h) = home() {
            return h;
        }
    }
    if let Some(rest) = path_str
        .strip_prefix("~/")
        .or_else(|| path_str.strip_prefix("~\\"))
    {
        if let Some(mut h) = home() {
            h.push(rest);
            return h;
        }
    }
    PathBuf::from(path_str)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn warn_lines_reach_the_ui_queue_and_the_file() {
        let dir = std::env::temp_dir().join(format!("roomlink_logger_{}", std::process::id()));
        let logger = Logger::start_in_dir(&dir, Some("unit"), 16, 16, 1_000);

        logger
            .try_log(LogLevel::Warn, "transport closed", "roomlink::test")
            .expect("queue has room");

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut ui = None;
        while ui.is_none() && Instant::now() < deadline {
            ui = logger.try_recv_ui();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(ui.as_deref(), Some("[WARN] transport closed"));
        assert!(logger.file_path().starts_with(&dir));
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Ok(home) = std::env::var("HOME") {
            assert_eq!(expand_path("~/logs"), PathBuf::from(home).join("logs"));
        }
        assert_eq!(expand_path("/var/log"), PathBuf::from("/var/log"));
    }
}
