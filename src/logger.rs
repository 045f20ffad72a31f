//! Logging for the library and CLI
//!
//! `log` records from this crate and `tracing` events (HTTP call sites) share one
//! sink: nothing, a log file, or stderr. Stdout is never used because it
//! carries the generated study material.

use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Environment variable that turns on verbose logging of HTTP internals
pub const VERBOSE_ENV_VAR: &str = "STUDY_CIRCLE_VERBOSE";

/// `--log-file` value that selects stderr instead of a file
pub const STDERR_DESTINATION: &str = "-";

/// Transport crates whose records are dropped unless verbose logging is on
const NOISY_TARGETS: &[&str] = &["reqwest", "hyper", "h2", "rustls", "want", "mio"];

/// Where log output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Stderr,
    File(PathBuf),
}

impl LogDestination {
    /// `-` means stderr; anything else is a file path
    pub fn parse(value: &str) -> Self {
        if value.trim() == STDERR_DESTINATION {
            Self::Stderr
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

enum Sink {
    Off,
    Stderr,
    File(File),
}

impl Sink {
    fn write_all(&mut self, bytes: &[u8]) {
        match self {
            Self::Off => {}
            Self::Stderr => {
                let _ = io::stderr().write_all(bytes);
            }
            Self::File(file) => {
                let _ = file.write_all(bytes);
                let _ = file.flush();
            }
        }
    }
}

struct Settings {
    enabled: bool,
    verbose: bool,
}

static SINK: LazyLock<Mutex<Sink>> = LazyLock::new(|| Mutex::new(Sink::Off));
static SETTINGS: LazyLock<Mutex<Settings>> = LazyLock::new(|| {
    Mutex::new(Settings {
        enabled: false,
        verbose: false,
    })
});

struct StudyCircleLogger;

static LOGGER: StudyCircleLogger = StudyCircleLogger;

/// Whether `target` belongs to a transport crate hidden outside verbose mode
pub fn is_noisy_target(target: &str) -> bool {
    NOISY_TARGETS.iter().any(|prefix| target.starts_with(prefix))
}

fn record_line(level: Level, target: &str, args: &std::fmt::Arguments<'_>) -> String {
    format!(
        "{} {} [{}] - {}\n",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        level,
        target,
        args
    )
}

impl log::Log for StudyCircleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let settings = SETTINGS.lock();
        if !settings.enabled || metadata.level() > Level::Debug {
            return false;
        }
        settings.verbose
            || metadata.target().starts_with("study_circle")
            || !is_noisy_target(metadata.target())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = record_line(record.level(), record.target(), record.args());
            SINK.lock().write_all(line.as_bytes());
        }
    }

    fn flush(&self) {}
}

/// Tracing formatter output, routed to the shared sink
#[derive(Clone, Copy)]
struct SinkWriter;

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if SETTINGS.lock().enabled {
            SINK.lock().write_all(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> fmt::MakeWriter<'a> for SinkWriter {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        *self
    }
}

/// Install the `log` logger and the `tracing` subscriber once per process
///
/// Nothing is written until [`enable_logging`] is called with a destination.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    use std::sync::{Once, OnceLock};
    static INIT: Once = Once::new();
    static INIT_RESULT: OnceLock<Result<(), String>> = OnceLock::new();

    INIT.call_once(|| {
        if std::env::var(VERBOSE_ENV_VAR).is_ok()
            || std::env::var("RUST_LOG").is_ok_and(|v| v.contains("debug") || v.contains("trace"))
        {
            set_verbose_logging(true);
        }

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "study_circle=debug,warn".into());
        let fmt_layer = fmt::Layer::new()
            .with_target(true)
            .with_ansi(false)
            .with_timer(fmt::time::ChronoUtc::rfc_3339())
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(SinkWriter);

        let tracing_result = Registry::default()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
        let log_result = log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Debug));

        // Either facade alone is enough to keep the crate's records flowing
        let result = match (tracing_result, log_result) {
            (Err(tracing_err), Err(log_err)) => Err(format!(
                "Failed to initialize logging: tracing={tracing_err}, log={log_err}"
            )),
            _ => Ok(()),
        };
        let _ = INIT_RESULT.set(result);
    });

    match INIT_RESULT.get() {
        Some(Ok(())) => Ok(()),
        Some(Err(e)) => Err(e.clone().into()),
        None => Err("Initialization failed unexpectedly".into()),
    }
}

/// Start writing records to `destination`
pub fn enable_logging(destination: &LogDestination) -> io::Result<()> {
    let sink = match destination {
        LogDestination::Stderr => Sink::Stderr,
        LogDestination::File(path) => {
            Sink::File(OpenOptions::new().create(true).append(true).open(path)?)
        }
    };
    *SINK.lock() = sink;
    SETTINGS.lock().enabled = true;
    Ok(())
}

pub fn disable_logging() {
    SETTINGS.lock().enabled = false;
    *SINK.lock() = Sink::Off;
}

pub fn set_verbose_logging(enabled: bool) {
    SETTINGS.lock().verbose = enabled;
}

pub fn is_logging_enabled() -> bool {
    SETTINGS.lock().enabled
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! trace_debug {
    (target: $target:expr, $($arg:tt)*) => {
        tracing::debug!(target: $target, $($arg)*)
    };
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}
