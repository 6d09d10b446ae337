//! # convert-api
//!
//! HTTP API layer for Convert-Studio built on Axum.
//!
//! Exposes the converter catalog, the multipart conversion endpoint and
//! health checks, with CORS, tracing and request logging middleware.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
