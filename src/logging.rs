use chrono::Local;
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::OnceLock;

/// Log topics that `--debug-filter` understands.
pub const TOPICS: [&str; 3] = ["net", "session", "ui"];

// Custom logger structure
#[derive(Debug)]
struct WhatBeatsLogger {
    level: LevelFilter,
    debug_filters: Option<HashSet<String>>,
}

impl log::Log for WhatBeatsLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        // Debug and trace records must match a topic filter when one is set
        if let Some(filters) = &self.debug_filters {
            if metadata.level() >= log::Level::Debug {
                return filters.contains(metadata.target())
                    || filters.iter().any(|f| metadata.target().starts_with(f.as_str()));
            }
        }
        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level_color = match record.level() {
            log::Level::Error => "\x1B[31m", // Red
            log::Level::Warn => "\x1B[33m",  // Yellow
            log::Level::Info => "\x1B[32m",  // Green
            log::Level::Debug => "\x1B[36m", // Cyan
            log::Level::Trace => "\x1B[35m", // Magenta
        };
        let reset = "\x1B[0m";
        let timestamp = Local::now().format("%H:%M:%S%.3f");

        let message = record.args().to_string();
        let context = session_tag(&message)
            .map(|tag| format!("[S:{}] ", tag))
            .unwrap_or_default();

        let output = format!(
            "{timestamp} {level_color}{level:5}{reset} {context}{target}: {message}",
            level = record.level(),
            target = record.target(),
        );

        // A closed stdout is not worth crashing the game over
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", output);
        let _ = stdout.flush();
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

/// Short tag for the session a message talks about, from "session <id>".
///
/// Only the first eight characters of the id are kept so log lines stay
/// aligned; server ids are UUIDs.
pub fn session_tag(message: &str) -> Option<String> {
    let idx = message.find("session ")?;
    let rest = &message[idx + "session ".len()..];
    let id: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .take(8)
        .collect();
    if id.is_empty() { None } else { Some(id) }
}

/// Parse a `--log-level` value; unknown values fall back to info.
pub fn parse_level(value: &str) -> LevelFilter {
    match value.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn parse_filters(debug_filter: Option<String>) -> Option<HashSet<String>> {
    debug_filter.map(|filter_str| {
        filter_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<HashSet<String>>()
    })
}

/// Entries of a `--debug-filter` value that match none of [`TOPICS`].
pub fn unknown_topics(debug_filter: &str) -> Vec<String> {
    debug_filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && !TOPICS.iter().any(|t| s.starts_with(t)))
        .map(str::to_string)
        .collect()
}

static LOGGER: OnceLock<WhatBeatsLogger> = OnceLock::new();

// Initialize the logger with optional debug filters
pub fn init_logger(level: LevelFilter, debug_filter: Option<String>) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| WhatBeatsLogger {
        level,
        debug_filters: parse_filters(debug_filter),
    });
    log::set_logger(logger).map(|()| log::set_max_level(level))
}

// Helper macros for specific debug topics
#[macro_export]
macro_rules! debug_net {
    ($($arg:tt)*) => {
        log::debug!(target: "net", "{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_session {
    ($($arg:tt)*) => {
        log::debug!(target: "session", "{}", format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_ui {
    ($($arg:tt)*) => {
        log::debug!(target: "ui", "{}", format_args!($($arg)*))
    };
}
