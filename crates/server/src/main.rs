//! Piwell server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use piwell_core::config::AppConfig;
use piwell_server::{AppState, create_router};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Piwell - a pi digit server
#[derive(Parser, Debug)]
#[command(name = "piwelld")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "PIWELL_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Startup banner
    tracing::info!("Piwell v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars and defaults cover everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();

    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("PIWELL_").split("__"))
        .extract()
        .context("failed to load configuration")?;
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;

    // Create application state
    let state = AppState::new(config.clone());

    // Probe the digit source so operators see availability at startup.
    // The source is opened per request, so a missing file is a warning
    // here, not a startup failure.
    let probe = {
        let source = state.source.clone();
        tokio::task::spawn_blocking(move || source.available_digits()).await?
    };
    match probe {
        Ok(digits) => tracing::info!(
            path = %config.source.path.display(),
            available_digits = digits,
            "Digit source ready"
        ),
        Err(error) => tracing::warn!(
            path = %config.source.path.display(),
            %error,
            "Digit source not readable, requests will fail until it appears"
        ),
    }

    // Create router
    let app = create_router(state);

    // Parse bind address
    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
