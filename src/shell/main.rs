use salon_booking::adapters::clock::SystemClock;
use salon_booking::shell::config::AppConfig;
use salon_booking::shell::http::router;
use salon_booking::shell::state::AppState;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    info!(
        salon = %config.salon_name,
        bind_addr = %config.bind_addr,
        closed_weekday = ?config.closed_weekday,
        "starting reservation authority"
    );

    let state = AppState::in_memory(&config, Arc::new(SystemClock));
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
