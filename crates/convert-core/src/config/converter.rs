//! Converter execution settings.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::ConverterDescriptor;

/// Settings for running conversions.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Wall-clock limit for one external tool invocation.
    #[serde(default = "default_timeout_seconds")]
    #[validate(range(min = 1, max = 3600))]
    pub timeout_seconds: u64,

    /// Root directory for per-request working directories.
    ///
    /// Defaults to the system temporary directory.
    #[serde(default)]
    pub temp_root: Option<PathBuf>,

    /// Smallest output (bytes) accepted as a successful conversion.
    #[serde(default = "default_min_output_bytes")]
    pub min_output_bytes: u64,

    /// Probe the catalog's external tools at startup.
    #[serde(default = "default_true")]
    pub probe_on_startup: bool,

    /// Additional converters merged over the built-in catalog.
    #[serde(default)]
    #[validate(nested)]
    pub extra: Vec<ConverterDescriptor>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            temp_root: None,
            min_output_bytes: default_min_output_bytes(),
            probe_on_startup: true,
            extra: Vec::new(),
        }
    }
}

impl ConverterConfig {
    /// Timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Resolve the effective temp root directory.
    pub fn effective_temp_root(&self) -> PathBuf {
        self.temp_root.clone().unwrap_or_else(std::env::temp_dir)
    }
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_min_output_bytes() -> u64 {
    1
}

fn default_true() -> bool {
    true
}
