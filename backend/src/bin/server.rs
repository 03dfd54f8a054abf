//! Students API HTTP Server Binary
//!
//! Loads the configuration, opens the configured repository, and serves the
//! REST API until Ctrl-C or SIGTERM.
//!
//! # Usage
//!
//! ```bash
//! CONFIG_PATH=config/local.toml cargo run --bin students-server
//! cargo run --bin students-server -- --config config/local.toml
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG_PATH`: configuration file path (wins over `--config`)
//! - `ENV`: overrides the `env` key of the configuration file
//! - `RUST_LOG`: log filter (default: info)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use students_api::config::Config;
use students_api::db::RepositoryFactory;
use students_api::http::{create_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "students-server")]
#[command(about = "Student records REST API")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(true).json())
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).context("failed to load configuration")?;
    init_tracing(config.is_production());

    info!(
        env = %config.env,
        backend = %config.storage_backend,
        "starting students-api"
    );

    let repository = RepositoryFactory::create(&config)
        .await
        .context("failed to initialize storage")?;
    info!(path = %config.storage_path, "storage initialized");

    let app = create_router(AppState::new(repository));

    let listener = tokio::net::TcpListener::bind(&config.http_server.address)
        .await
        .with_context(|| format!("failed to bind {}", config.http_server.address))?;
    info!(address = %config.http_server.address, "server started");

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server: JoinHandle<std::io::Result<()>> = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            return result.context("server task failed")?.context("server error");
        }
        _ = shutdown_signal() => {}
    }

    info!("shutting down server");
    let _ = stop_tx.send(());
    wait_for_drain(server, config.shutdown_timeout()).await
}

async fn wait_for_drain(server: JoinHandle<std::io::Result<()>>, grace: Duration) -> Result<()> {
    match tokio::time::timeout(grace, server).await {
        Ok(joined) => {
            joined.context("server task failed")?.context("server error")?;
            info!("server shutdown successfully");
        }
        Err(_) => {
            warn!(grace_secs = grace.as_secs(), "in-flight requests did not finish in time");
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
