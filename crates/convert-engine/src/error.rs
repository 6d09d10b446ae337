//! Error type for converter lookup and invocation.
//!
//! Every failure a conversion request can hit is a `ConversionError`.
//! [`ConversionError::kind`] buckets them into the five classes the HTTP
//! layer reports, and the `From` impl maps them onto
//! `convert_core::error::AppError`.

use std::path::PathBuf;

use convert_core::error::AppError;
use serde_json::json;
use thiserror::Error;

/// Maximum number of stderr characters kept in an error.
pub const STDERR_LIMIT: usize = 2000;

/// Classification of a failed conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionErrorKind {
    /// The requested converter name is not in the catalog.
    UnknownConverter,
    /// The external tool exceeded the wall-clock limit.
    Timeout,
    /// The external tool could not start or exited unsuccessfully.
    ExecutionFailed,
    /// The tool succeeded but no usable output was found.
    OutputMissing,
    /// The converter catalog itself is invalid.
    Configuration,
    /// Anything else (I/O during setup or teardown, task failures).
    Unexpected,
}

/// Errors from converter lookup and invocation.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Converter name not found in the registry.
    #[error("Unknown converter: {name}. Available: {}", .available.join(", "))]
    UnknownConverter {
        /// The requested name.
        name: String,
        /// Names known to the registry.
        available: Vec<String>,
    },

    /// The process ran past its timeout and was killed.
    #[error("Conversion timeout ({timeout_seconds}s limit exceeded)")]
    Timeout {
        /// The limit that was exceeded.
        timeout_seconds: u64,
    },

    /// The process could not be started or exited with a failure status.
    #[error("Conversion failed: '{program}' {}: {stderr}", describe_exit(.exit_code))]
    ExecutionFailed {
        /// The program that was run.
        program: String,
        /// Exit code, `None` when the process never started or was signalled.
        exit_code: Option<i32>,
        /// Captured standard error (truncated).
        stderr: String,
    },

    /// No output file matched the expected naming.
    #[error("Conversion completed but output file not found: {expected}")]
    OutputMissing {
        /// The candidate output path.
        expected: PathBuf,
    },

    /// An output file exists but is below the accepted size.
    #[error("Conversion produced an unusable output ({size} bytes): {path}")]
    OutputTooSmall {
        /// Path of the produced file.
        path: PathBuf,
        /// Its size in bytes.
        size: u64,
    },

    /// A converter descriptor failed validation.
    #[error("Invalid converter '{name}': {reason}")]
    InvalidConverter {
        /// Converter name.
        name: String,
        /// Validation failure description.
        reason: String,
    },

    /// Two descriptors share a name.
    #[error("Duplicate converter name: {name}")]
    DuplicateConverter {
        /// The duplicated name.
        name: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Tokio task join error.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {code}"),
        None => "did not exit normally".to_string(),
    }
}

impl ConversionError {
    /// Build an execution failure, truncating stderr.
    pub fn execution_failed(
        program: impl Into<String>,
        exit_code: Option<i32>,
        stderr: &str,
    ) -> Self {
        Self::ExecutionFailed {
            program: program.into(),
            exit_code,
            stderr: truncate(stderr.trim(), STDERR_LIMIT),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ConversionErrorKind {
        match self {
            Self::UnknownConverter { .. } => ConversionErrorKind::UnknownConverter,
            Self::Timeout { .. } => ConversionErrorKind::Timeout,
            Self::ExecutionFailed { .. } => ConversionErrorKind::ExecutionFailed,
            Self::OutputMissing { .. } | Self::OutputTooSmall { .. } => {
                ConversionErrorKind::OutputMissing
            }
            Self::InvalidConverter { .. } | Self::DuplicateConverter { .. } => {
                ConversionErrorKind::Configuration
            }
            Self::Io(_) | Self::Join(_) => ConversionErrorKind::Unexpected,
        }
    }
}

/// Keep at most `limit` characters of `text`.
pub(crate) fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

impl From<ConversionError> for AppError {
    fn from(err: ConversionError) -> Self {
        match &err {
            ConversionError::UnknownConverter { available, .. } => {
                AppError::validation(err.to_string())
                    .with_code("UNKNOWN_CONVERTER")
                    .with_details(json!({ "available": available }))
            }
            ConversionError::Timeout { timeout_seconds } => AppError::timeout(err.to_string())
                .with_code("TIMEOUT")
                .with_details(json!({ "timeout_seconds": timeout_seconds })),
            ConversionError::ExecutionFailed {
                program, exit_code, ..
            } => AppError::external_tool(err.to_string())
                .with_code("EXECUTION_FAILED")
                .with_details(json!({ "program": program, "exit_code": exit_code })),
            ConversionError::OutputMissing { .. } | ConversionError::OutputTooSmall { .. } => {
                AppError::external_tool(err.to_string()).with_code("OUTPUT_MISSING")
            }
            ConversionError::InvalidConverter { .. } | ConversionError::DuplicateConverter { .. } => {
                AppError::configuration(err.to_string())
            }
            ConversionError::Io(_) | ConversionError::Join(_) => {
                AppError::internal(format!("Conversion error: {err}")).with_code("INTERNAL_ERROR")
            }
        }
    }
}
