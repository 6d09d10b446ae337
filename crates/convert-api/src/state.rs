//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use convert_core::config::AppConfig;
use convert_engine::{ConversionService, ConverterRegistry, DependencyReport};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped or `Copy` for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Immutable converter catalog
    pub registry: Arc<ConverterRegistry>,
    /// Conversion service
    pub conversions: Arc<ConversionService>,
    /// Tool availability found at startup
    pub dependencies: Arc<DependencyReport>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Assemble state from configuration, catalog and probe result.
    pub fn new(
        config: AppConfig,
        registry: Arc<ConverterRegistry>,
        dependencies: DependencyReport,
    ) -> Self {
        let conversions = ConversionService::from_config(&config.converters, Arc::clone(&registry));
        Self {
            config: Arc::new(config),
            registry,
            conversions: Arc::new(conversions),
            dependencies: Arc::new(dependencies),
            started_at: Instant::now(),
        }
    }
}
