//! File logging setup
//!
//! The terminal belongs to the dashboard, so log records are appended to a
//! file, one line per record:
//! `2024-01-02 03:04:05 - [PID:4242] - INFO - message`.

use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use log::Level;

/// Timestamp layout of each line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Map `-d` verbosity to a default filter.
///
/// Levels 0 and 1 both log at info since records go to a file, not the screen.
pub fn level_for_verbosity(debug: u8) -> &'static str {
    match debug {
        0 | 1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Render one log line (without the trailing newline)
pub fn format_line(timestamp: &NaiveDateTime, pid: u32, level: Level, message: impl Display) -> String {
    format!(
        "{} - [PID:{}] - {} - {}",
        timestamp.format(TIMESTAMP_FORMAT),
        pid,
        level,
        message
    )
}

/// Initialize the global logger, appending to `path`.
///
/// `RUST_LOG` overrides the level picked from `debug`.
pub fn init(path: &Path, debug: u8) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Could not open log file {}", path.display()))?;

    let pid = std::process::id();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level_for_verbosity(debug)))
        .format(move |buf, record| {
            writeln!(
                buf,
                "{}",
                format_line(&Local::now().naive_local(), pid, record.level(), record.args())
            )
        })
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("Logger already initialized")?;
    Ok(())
}
