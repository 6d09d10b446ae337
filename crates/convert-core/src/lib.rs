//! # convert-core
//!
//! Core crate for Convert-Studio. Contains configuration schemas, the
//! serialisable converter descriptor, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Convert-Studio crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
