//! Global error handling for onefile
//!
//! Structural failures of a pack or unpack run are represented here. Per-file
//! problems never reach this type: unreadable files become placeholder content
//! and failed writes become [`UnpackWarning`](crate::types::UnpackWarning)s.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Global error type for onefile operations
#[derive(Error, Debug)]
pub enum OfpError {
    /// The document has no recognizable structure section
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// The document to unpack or the directory to pack does not exist
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The unpack target already contains entries
    #[error("Target directory is not empty: {}", .0.display())]
    TargetNotEmpty(PathBuf),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unexpected error
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Specialized Result type for onefile operations
pub type Result<T> = std::result::Result<T, OfpError>;

/// Creates an OfpError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::OfpError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T, E> {
    /// Add additional context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            OfpError::Unexpected(format!("{}: {}", context, e))
        })
    }
}

// main() returns io::Result, so structural failures surface through io::Error
impl From<OfpError> for io::Error {
    fn from(err: OfpError) -> Self {
        let kind = match &err {
            OfpError::SourceNotFound(_) => io::ErrorKind::NotFound,
            OfpError::TargetNotEmpty(_) => io::ErrorKind::AlreadyExists,
            OfpError::MalformedDocument(_) | OfpError::InvalidArgument(_) => {
                io::ErrorKind::InvalidData
            }
            OfpError::Io(e) => e.kind(),
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, err.to_string())
    }
}
