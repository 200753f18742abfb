//! Logging for the cine capture crate
//!
//! Every diagnostic goes through one replaceable `Logger` (colored console
//! output by default) behind a process-wide slot, with a severity threshold
//! in front of it. `cine_error!` entries carry the call site's file:line.
//!
//! The logger slot and the threshold are the only process-wide state in
//! the crate.

use colored::*;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{OnceLock, PoisonError, RwLock};
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Entries below this severity are dropped (stored as `LogSeverity as u8`)
static MIN_SEVERITY: AtomicU8 = AtomicU8::new(0);

/// Logger trait for custom logging implementations
///
/// Implement this trait to route capture diagnostics elsewhere
/// (editor message log, file, test capture, etc.)
///
/// # Example
///
/// ```no_run
/// use cine_capture::cine::log::{Logger, LogEntry};
///
/// struct MessageLog;
///
/// impl Logger for MessageLog {
///     fn log(&self, entry: &LogEntry) {
///         // Forward to the editor...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level (Trace, Debug, Info, Warn, Error)
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source component (e.g., "cine::Scheduler", "cine::ViewStateSlot")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose information (per-capture scheduling decisions)
    Trace,

    /// Development/debugging information
    Debug,

    /// Important informational messages
    Info,

    /// Warnings (inefficient usage, recoverable issues)
    Warn,

    /// Error messages (with file:line details)
    Error,
}

impl LogSeverity {
    fn as_u8(self) -> u8 {
        self as u8
    }

    fn label(self) -> ColoredString {
        match self {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        }
    }
}

/// Console logger: `[timestamp] [SEVERITY] [source] message (file:line)`
///
/// The location suffix is only printed when the entry carries one.
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let location = match (entry.file, entry.line) {
            (Some(file), Some(line)) => format!(" ({}:{})", file, line),
            _ => String::new(),
        };

        println!(
            "[{}] [{}] [{}] {}{}",
            datetime.format("%Y-%m-%d %H:%M:%S%.3f"),
            entry.severity.label(),
            entry.source.bright_blue(),
            entry.message,
            location
        );
    }
}

fn logger_slot() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

// ===== LOGGING API =====

/// Replace the current logger (DefaultLogger until set)
pub fn set_logger<L: Logger + 'static>(logger: L) {
    let mut slot = logger_slot().write().unwrap_or_else(PoisonError::into_inner);
    *slot = Box::new(logger);
}

/// Restore the DefaultLogger and the Trace threshold
pub fn reset_logger() {
    set_logger(DefaultLogger);
    set_min_severity(LogSeverity::Trace);
}

/// Drop entries below `severity` before they reach the logger.
///
/// Scheduling decisions are logged at Trace once per capture per frame;
/// hosts usually raise this to Debug or Info.
pub fn set_min_severity(severity: LogSeverity) {
    MIN_SEVERITY.store(severity.as_u8(), Ordering::Relaxed);
}

/// Whether entries of `severity` are currently forwarded
pub fn is_enabled(severity: LogSeverity) -> bool {
    severity.as_u8() >= MIN_SEVERITY.load(Ordering::Relaxed)
}

fn dispatch(
    severity: LogSeverity,
    source: &str,
    message: String,
    location: Option<(&'static str, u32)>,
) {
    if !is_enabled(severity) {
        return;
    }

    let entry = LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: source.to_string(),
        message,
        file: location.map(|(file, _)| file),
        line: location.map(|(_, line)| line),
    };
    logger_slot()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .log(&entry);
}

/// Log without source location (cine_trace! .. cine_warn!)
pub fn log(severity: LogSeverity, source: &str, message: String) {
    dispatch(severity, source, message, None);
}

/// Log with file:line (cine_error!, cine_err!)
pub fn log_detailed(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: &'static str,
    line: u32,
) {
    dispatch(severity, source, message, Some((file, line)));
}

// ===== LOGGING MACROS =====
//
// All take `(source, format, args...)`. Sources are "cine::<Component>".

/// Log at Trace (per-capture scheduling decisions)
///
/// ```ignore
/// cine_trace!("cine::Scheduler", "Capture '{}' skipped: no active scene", name);
/// ```
#[macro_export]
macro_rules! cine_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log($crate::log::LogSeverity::Trace, $source, format!($($arg)*))
    };
}

/// Log at Debug (registration and teardown)
#[macro_export]
macro_rules! cine_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log($crate::log::LogSeverity::Debug, $source, format!($($arg)*))
    };
}

/// Log at Info
#[macro_export]
macro_rules! cine_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log($crate::log::LogSeverity::Info, $source, format!($($arg)*))
    };
}

/// Log at Warn (inefficient usage, exhausted pools)
#[macro_export]
macro_rules! cine_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log($crate::log::LogSeverity::Warn, $source, format!($($arg)*))
    };
}

/// Log at Error with the call site's file:line
#[macro_export]
macro_rules! cine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!(),
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
