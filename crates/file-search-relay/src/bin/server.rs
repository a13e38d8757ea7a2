//! Upload relay server binary
//!
//! Run with: cargo run -p file-search-relay --bin file-search-relay-server

use file_search_relay::{config::RelayConfig, server::RelayServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "file_search_relay=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Environment is read here, once, and never again per request
    let config = RelayConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - File search API: {}", config.upload.api_base_url);
    tracing::info!(
        "  - Poll interval: {}s, max wait: {}s",
        config.upload.poll_interval_secs,
        config.upload.max_wait_secs
    );
    tracing::info!(
        "  - Proxy: {}",
        if config.transport.proxy_url.is_some() { "configured" } else { "none" }
    );
    if let Some(cert) = &config.transport.ssl_cert_file {
        tracing::info!("  - CA certificate: {}", cert.display());
    }

    let server = RelayServer::new(config)?;

    println!("\nUpload relay starting on http://{}", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/upload-document - Upload and index a document");
    println!("  GET  /api/health          - Health check");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
