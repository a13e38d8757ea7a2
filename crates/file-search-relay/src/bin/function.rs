//! Upload relay as a single-handler function
//!
//! Serves [`file_search_relay::function::handle`] for every request, the way
//! a function host would invoke it.
//!
//! Run with: cargo run -p file-search-relay --bin file-search-relay-function

use file_search_relay::{config::RelayConfig, function, server::AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "file_search_relay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RelayConfig::load()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Upload function listening on http://{}{}", addr, function::UPLOAD_PATH);

    axum::serve(listener, function::build_function_router(state)).await?;

    Ok(())
}
