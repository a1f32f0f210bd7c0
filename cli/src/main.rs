//! acidsim server - binary entry point.
//!
//! ```text
//! main() -> load config -> init_tracing() -> Simulation::new()
//!        -> bind listener -> axum::serve(router) until ctrl-c -> shutdown()
//! ```

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use acidsim_config::{AcidsimConfig, ConfigError, LogConfig};
use acidsim_engine::Simulation;

const DEFAULT_FILTER: &str = "info";

fn init_tracing(log: &LogConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log.filter.as_deref().unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (log_file, init_warnings) = match log.file.as_deref() {
        Some(path) => open_log_file(path),
        None => (None, Vec::new()),
    };

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        return;
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    for warning in init_warnings {
        tracing::warn!("{warning}; logging to stderr");
    }
}

fn open_log_file(path: &Path) -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warnings.push(format!(
            "Failed to create log dir {}: {e}",
            parent.display()
        ));
        return (None, warnings);
    }

    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => (Some((path.to_path_buf(), file)), warnings),
        Err(e) => {
            warnings.push(format!("Failed to open log file {}: {e}", path.display()));
            (None, warnings)
        }
    }
}

/// Resolve the config before tracing exists; the error is reported once the
/// subscriber is up.
fn load_config() -> (AcidsimConfig, Option<ConfigError>) {
    let (config, error) = match AcidsimConfig::load() {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(err) => (AcidsimConfig::default(), Some(err)),
    };
    (config.with_env_overrides(), error)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_error) = load_config();
    init_tracing(&config.log);

    if let Some(err) = config_error {
        tracing::warn!(path = %err.path().display(), "{err}; using defaults");
    }

    let sim = Simulation::new(&config.simulation);
    if config.simulation.autostart() {
        sim.start();
    }

    let listener = TcpListener::bind(config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    let addr = listener.local_addr()?;
    tracing::info!(
        cors = config.server.cors,
        timestep_s = sim.timestep_s(),
        "Listening on http://{addr}"
    );

    axum::serve(listener, acidsim::router(sim.clone(), config.server.cors))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    sim.shutdown();
    Ok(())
}
