use settle_server::{AppState, app, config::Config};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "settle_server=debug,settle_feed=debug,tower_http=info";

// ===== Main =====

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env()?;
    let state = AppState::seeded(config.viewer_location);
    tracing::info!(
        viewer = %state.viewer().handle,
        lat = config.viewer_location.latitude,
        lon = config.viewer_location.longitude,
        "seeded demo feed"
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!("Server running on http://{}", config.addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
