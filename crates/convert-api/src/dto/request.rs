//! Request DTOs.

use serde::Deserialize;

/// Query for `GET /converters`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConverterQuery {
    /// Only list converters accepting this MIME type.
    pub input_type: Option<String>,
}
