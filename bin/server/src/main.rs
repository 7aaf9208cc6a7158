use clap::Parser;
use fbrp_server::{
    app,
    auth::AppState,
    config::{DEFAULT_CONFIG_PATH, GateConfig},
    error::ServerError,
};
use rootcause::prelude::Report;
use std::{net::SocketAddr, path::PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Serve a directory to members of one group.
#[derive(Debug, Parser)]
#[command(name = "fbrp", version, about)]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(report) = run(cli).await {
        tracing::error!(error = %report, "fatal");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Report<ServerError>> {
    tracing::info!(path = %cli.config.display(), "reading configuration");
    let config = GateConfig::load(&cli.config).map_err(ServerError::from)?;
    tracing::info!(
        hostname = %config.hostname,
        port = config.internal_port,
        serve_root = %config.serve_root.display(),
        "loaded configuration"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.internal_port));
    let state = AppState::new(config)?;
    let app = app::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind {
            addr: addr.to_string(),
            details: e.to_string(),
        })?;

    tracing::info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Serve {
            details: e.to_string(),
        })?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Ctrl+C received, shutting down");
}
