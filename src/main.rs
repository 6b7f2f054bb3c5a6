//! PrismFin - dashboard API server
//! Serves generated portfolio, quant, screener and news data to the SPA.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prismfin_backend::{
    api::{create_router, AppState},
    config::{load_env, Config},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    let config = Config::parse();
    info!("🚀 PrismFin API starting");

    let store = config.open_store()?;
    store
        .ensure_seed()
        .await
        .context("Failed to seed dashboard state")?;

    let app = create_router(AppState::new(store));

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "prismfin_backend=debug,prismfin=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
