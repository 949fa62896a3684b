use folio_server::{build_router, config::AppConfig, state::AppState};
use tracing::{Level, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::from_config(config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Folio API listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
