use anyhow::Context;
use battle_subway_helper::config::Settings;
use battle_subway_helper::http::router;
use battle_subway_helper::loader::load_service;
use battle_subway_helper::logging::init_tracing;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    init_tracing(&settings.log_level);

    let service = load_service(&settings.paths(), settings.strategy)
        .with_context(|| format!("loading data from {}", settings.data_dir.display()))?;

    let address = settings
        .bind_address()
        .with_context(|| format!("invalid bind address {}:{}", settings.host, settings.port))?;
    let app = router(Arc::new(service), &settings.cors_origins());

    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("binding {}", address))?;
    info!(%address, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => {
            warn!("cannot listen for ctrl-c: {}", err);
            std::future::pending::<()>().await;
        }
    }
}
