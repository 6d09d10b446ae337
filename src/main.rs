//! Convert-Studio Server: file-format conversion gateway.
//!
//! Main entry point that loads configuration, builds the converter catalog
//! and starts the HTTP server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use convert_api::{AppState, build_router};
use convert_core::config::AppConfig;
use convert_core::error::AppError;
use convert_engine::{ConverterRegistry, DependencyReport, ToolProbe};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and the environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("CONVERT_STUDIO_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Convert-Studio v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Converter catalog ────────────────────────────────
    let registry = ConverterRegistry::builtin().with_extra(config.converters.extra.clone())?;
    tracing::info!(converters = registry.len(), "Converter catalog loaded");

    // ── Step 2: Probe external tools (advisory) ──────────────────
    let dependencies = if config.converters.probe_on_startup {
        let report = registry.probe_dependencies(&ToolProbe::from_env());
        report.log();
        report
    } else {
        DependencyReport::default()
    };

    // ── Step 3: Temp root ────────────────────────────────────────
    let temp_root = config.converters.effective_temp_root();
    tokio::fs::create_dir_all(&temp_root).await.map_err(|e| {
        AppError::storage(format!(
            "Failed to create temp root '{}': {e}",
            temp_root.display()
        ))
    })?;
    tracing::info!(
        temp_root = %temp_root.display(),
        timeout_seconds = config.converters.timeout_seconds,
        "Conversion settings"
    );

    // ── Step 4: Build and start HTTP server ──────────────────────
    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let state = AppState::new(config, Arc::new(registry), dependencies);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Convert-Studio listening on {}", addr);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .into_future();
    tokio::pin!(server);

    // ── Step 5: Drain in-flight conversions within the grace period ──
    tokio::select! {
        result = &mut server => {
            return result.map_err(|e| AppError::internal(format!("Server error: {e}")));
        }
        _ = shutdown_rx.changed() => {}
    }

    match tokio::time::timeout(grace, &mut server).await {
        Ok(result) => result.map_err(|e| AppError::internal(format!("Server error: {e}")))?,
        Err(_) => tracing::warn!(
            grace_seconds = grace.as_secs(),
            "Grace period elapsed with requests still in flight"
        ),
    }

    tracing::info!("Convert-Studio server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
