//! Logging bootstrap.
//!
//! Two layers share one registry:
//! - a daily-rolling file in `LOG_DIR` with one JSON object per line
//! - stdout, human readable in debug builds, selectable with `LOG_FORMAT` in release
//!
//! JSON records carry timestamp (ISO 8601 with offset, millisecond precision),
//! level, target, pid, tid, file, line, message, structured fields and the
//! crate version. `RUST_LOG` overrides both filters. Records emitted through
//! the `log` facade are bridged into `tracing`.

mod formatters;

use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

use formatters::{HumanReadableFormatter, JsonFormatter};

const LOG_FILE_PREFIX: &str = "codestreak.log";

static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();
static LOGGER_READY: OnceLock<()> = OnceLock::new();
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Stdout rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdoutFormat {
    Pretty,
    Json,
    Off,
}

impl StdoutFormat {
    /// Debug builds always print pretty output; release builds follow `LOG_FORMAT`
    pub fn from_env() -> Self {
        if cfg!(debug_assertions) {
            return StdoutFormat::Pretty;
        }
        std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(StdoutFormat::Json)
    }
}

impl FromStr for StdoutFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Ok(StdoutFormat::Pretty),
            "json" => Ok(StdoutFormat::Json),
            "off" | "none" => Ok(StdoutFormat::Off),
            other => Err(format!("Unknown log format: {}", other)),
        }
    }
}

/// Initialize the global subscriber. Calling it twice is a no-op.
pub fn init_logger(log_dir: &Path) -> anyhow::Result<()> {
    if LOGGER_READY.get().is_some() {
        return Ok(());
    }

    std::fs::create_dir_all(log_dir)?;
    let _ = LOG_DIR.set(log_dir.to_path_buf());

    let _ = LogTracer::builder()
        .with_max_level(LevelFilter::Trace)
        .init();

    let file_appender = rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = FILE_GUARD.set(guard);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(JsonFormatter::new())
        .with_filter(file_filter());

    let stdout_format = StdoutFormat::from_env();
    let pretty_layer = (stdout_format == StdoutFormat::Pretty).then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .event_format(HumanReadableFormatter::new())
            .with_filter(stdout_filter())
    });
    let json_stdout_layer = (stdout_format == StdoutFormat::Json).then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(false)
            .event_format(JsonFormatter::new())
            .with_filter(stdout_filter())
    });

    let subscriber = Registry::default()
        .with(file_layer)
        .with(pretty_layer)
        .with(json_stdout_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    let _ = LOGGER_READY.set(());

    tracing::info!(
        target: "codestreak::logging",
        log_dir = %log_dir.display(),
        version = env!("CARGO_PKG_VERSION"),
        profile = if cfg!(debug_assertions) { "debug" } else { "release" },
        stdout = ?stdout_format,
        "Logger initialized"
    );

    Ok(())
}

fn file_filter() -> EnvFilter {
    let default_level = if cfg!(debug_assertions) {
        "debug,codestreak=trace,sqlx=warn,hyper=info"
    } else {
        "info,sqlx=warn"
    };

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn stdout_filter() -> EnvFilter {
    let default_level = if cfg!(debug_assertions) {
        "debug,sqlx=warn,hyper=info"
    } else {
        "info,sqlx=warn"
    };

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Directory passed to [`init_logger`], if it ran
pub fn get_log_dir() -> Option<PathBuf> {
    LOG_DIR.get().cloned()
}
