//! Error types for the cine capture crate
//!
//! This module defines the error types used throughout the crate,
//! including view-state allocation, world lookup and capture lifecycle.

use std::fmt;

/// Result type for cine capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Cine capture errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Collaborator failure (renderer allocator, poisoned lock, etc.)
    BackendError(String),

    /// View-state pool exhausted
    OutOfMemory,

    /// Invalid resource (unknown world, detached capture, etc.)
    InvalidResource(String),

    /// Operation not allowed in the current lifecycle state
    InvalidState(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of view-state memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an error with file:line and build an `Error::BackendError` from it.
///
/// # Example
///
/// ```ignore
/// let world = worlds.get(key)
///     .ok_or_else(|| cine_err!("cine::Scheduler", "World {:?} not registered", key))?;
/// ```
#[macro_export]
macro_rules! cine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        $crate::error::Error::BackendError(message)
    }};
}

/// Log an error and return it from the current function.
#[macro_export]
macro_rules! cine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::cine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
