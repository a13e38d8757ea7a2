//! Application state shared by both HTTP bindings

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::error::Result;
use crate::processing::UploadOrchestrator;
use crate::providers::{GeminiConnector, ProviderConnector, TransportSettings};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration, read once at boot
    config: RelayConfig,
    /// Upload orchestrator
    orchestrator: UploadOrchestrator,
}

impl AppState {
    /// Create state backed by the Gemini file-search API
    pub fn new(config: RelayConfig) -> Result<Self> {
        let transport = TransportSettings::from_config(&config.transport)?;
        if transport.effective_proxy(None).is_some() {
            tracing::info!("Process-wide proxy configured for file-search calls");
        }
        let connector = Arc::new(GeminiConnector::new(transport, &config.upload));
        Ok(Self::with_connector(config, connector))
    }

    /// Create state with a custom provider connector
    pub fn with_connector(config: RelayConfig, connector: Arc<dyn ProviderConnector>) -> Self {
        let orchestrator = UploadOrchestrator::new(connector, config.upload.clone());
        Self::with_orchestrator(config, orchestrator)
    }

    /// Create state around a prepared orchestrator
    pub fn with_orchestrator(config: RelayConfig, orchestrator: UploadOrchestrator) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                orchestrator,
            }),
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.inner.config
    }

    pub fn orchestrator(&self) -> &UploadOrchestrator {
        &self.inner.orchestrator
    }
}
