//! Shared data types.

pub mod converter;

pub use converter::{ConverterDescriptor, PLACEHOLDERS};
