//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod converter;
pub mod logging;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use self::app::{CorsConfig, ServerConfig};
pub use self::converter::ConverterConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;
use crate::result::AppResult;

/// Prefix for environment variable overrides (`CONVERT_STUDIO__SERVER__PORT`).
pub const ENV_PREFIX: &str = "CONVERT_STUDIO";

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// files (default.toml + environment overlay + environment variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Conversion settings.
    #[serde(default)]
    pub converters: ConverterConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files under `dir`.
    ///
    /// Merges `{dir}/default.toml` with an environment-specific overlay
    /// `{dir}/{env}.toml` and environment variables prefixed with
    /// `CONVERT_STUDIO`. Missing files are skipped.
    pub fn load_from(dir: &str, env: &str) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration from the `config/` directory.
    pub fn load(env: &str) -> AppResult<Self> {
        Self::load_from("config", env)
    }

    /// Validate every section that carries constraints.
    pub fn validate_all(&self) -> AppResult<()> {
        self.converters.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_files() {
        let config = AppConfig::load_from("/nonexistent/convert-studio", "test").expect("load");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.converters.timeout_seconds, 60);
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.server.cors.allowed_origins,
            vec!["http://localhost:5173", "http://localhost:3000"]
        );
        assert!(config.server.cors.allow_credentials);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9100

            [converters]
            timeout_seconds = 5
            "#,
        )
        .expect("parse toml");

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.bind_address(), "0.0.0.0:9100");
        assert_eq!(config.converters.timeout_seconds, 5);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.validate_all().is_ok());
    }

    #[test]
    fn test_validate_all_rejects_bad_timeout() {
        let mut config = AppConfig::default();
        config.converters.timeout_seconds = 100_000;
        let err = config.validate_all().expect_err("should fail");
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }
}
