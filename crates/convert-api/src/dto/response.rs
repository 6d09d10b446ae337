//! Response DTOs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use convert_core::types::ConverterDescriptor;
use convert_engine::{DependencyReport, MetricsSnapshot};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Service metadata for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name.
    pub message: String,
    /// Crate version.
    pub version: String,
    /// Converter names, sorted.
    pub available_converters: Vec<String>,
}

/// One catalog entry as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterEntry {
    /// Display label.
    pub label: String,
    /// Output file extension.
    pub output_format: String,
    /// Accepted MIME types.
    pub input_types: Vec<String>,
    /// Packages the converter needs.
    pub requirements: Vec<String>,
}

impl From<&ConverterDescriptor> for ConverterEntry {
    fn from(d: &ConverterDescriptor) -> Self {
        Self {
            label: d.label.clone(),
            output_format: d.output_extension.clone(),
            input_types: d.input_types.clone(),
            requirements: d.requires.clone(),
        }
    }
}

/// Catalog listing for `GET /converters`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterList {
    /// Converters keyed by name.
    pub converters: BTreeMap<String, ConverterEntry>,
}

/// Liveness payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `healthy` while the process serves requests.
    pub status: String,
    /// Current time.
    pub timestamp: DateTime<Utc>,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// `healthy`, or `degraded` when tools are missing.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
    /// Number of registered converters.
    pub converter_count: usize,
    /// Tool availability found at startup.
    pub dependencies: DependencyReport,
    /// Conversion counters.
    pub metrics: MetricsSnapshot,
    /// Current time.
    pub timestamp: DateTime<Utc>,
}
