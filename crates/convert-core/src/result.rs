//! Convenience result type alias for Convert-Studio.

use crate::error::AppError;

/// A specialized `Result` type for Convert-Studio operations.
pub type AppResult<T> = Result<T, AppError>;
