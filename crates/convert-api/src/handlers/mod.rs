//! Route handlers.

pub mod convert;
pub mod converters;
pub mod health;
pub mod root;
