use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use quickthoughts_core::config::{QuickThoughtsConfig, StoreBackend};
use quickthoughts_gateway::{build_router, AppState};
use quickthoughts_telegram::TelegramMessenger;

#[derive(Parser, Debug)]
#[command(
    name = "quickthoughts-gateway",
    version,
    about = "Telegram to Obsidian quick-thoughts relay"
)]
struct Args {
    /// Path to quickthoughts.toml (default: $QUICKTHOUGHTS_CONFIG or
    /// ~/.quickthoughts/quickthoughts.toml).
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quickthoughts_gateway=info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    // load config: explicit path > QUICKTHOUGHTS_CONFIG env > ~/.quickthoughts/quickthoughts.toml
    let config_path = args
        .config
        .or_else(|| std::env::var("QUICKTHOUGHTS_CONFIG").ok());
    let config = QuickThoughtsConfig::load(config_path.as_deref()).context("loading config")?;
    if let Err(e) = config.validate_gateway() {
        tracing::error!(code = e.code(), "invalid configuration: {e}");
        return Err(e.into());
    }

    let kv = quickthoughts_store::open(&config.store).context("opening store")?;
    match config.store.backend {
        StoreBackend::Sqlite => info!(backend = kv.name(), path = %config.store.path, "store ready"),
        StoreBackend::Memory => {
            tracing::warn!(backend = kv.name(), "in-memory store: thoughts are lost on restart")
        }
        StoreBackend::Cloudflare => info!(backend = kv.name(), "store ready"),
    }

    let messenger = Arc::new(TelegramMessenger::new(&config.telegram)?);

    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;
    let state = Arc::new(AppState::new(config, kv, messenger));
    let router = build_router(state);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Quick Thoughts gateway listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
