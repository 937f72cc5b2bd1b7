//! Log sink setup.
//!
//! Logs are written to the configured log file, and mirrored to stderr when
//! running verbosely. Without a log file everything goes to stderr.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use strum_macros::{Display, EnumString};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Log verbosity, as spelled in `LOG_TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum LogLevel {
    #[strum(serialize = "DEBUG")]
    Debug,
    #[strum(serialize = "INFO")]
    Info,
    #[strum(to_string = "WARNING", serialize = "WARN")]
    Warning,
    #[strum(to_string = "ERROR", serialize = "CRITICAL")]
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warning => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// Installs the global subscriber. Only the first call takes effect.
///
/// At debug level each line also carries its source file and line.
/// Fails only when the log file cannot be opened for appending.
pub fn init_logging(level: LogLevel, log_file: Option<&Path>, console: bool) -> io::Result<()> {
    let with_location = level == LogLevel::Debug;

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_file(with_location)
                    .with_line_number(with_location)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let console_layer = (console || log_file.is_none()).then(|| {
        fmt::layer()
            .with_file(with_location)
            .with_line_number(with_location)
            .with_writer(io::stderr)
    });

    tracing_subscriber::registry()
        .with(LevelFilter::from_level(level.into()))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .ok();

    Ok(())
}
