//! Upload orchestrator
//!
//! One request runs one upload and one poll loop; nothing is shared between
//! requests apart from the connector. On timeout the remote operation keeps
//! running, only this request gives up.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::time::{sleep, timeout, Instant};

use crate::config::UploadConfig;
use crate::error::{Error, Result};
use crate::ingestion::StagedFile;
use crate::providers::{FileSearchProvider, ProviderConnector};
use crate::types::{DocumentDescriptor, Operation, StoreName, UploadRequest};

use super::normalize::{extract_document, select_from_listing};

/// Runs uploads against the file-search provider
pub struct UploadOrchestrator {
    connector: Arc<dyn ProviderConnector>,
    settings: UploadConfig,
    staging_dir: PathBuf,
}

impl UploadOrchestrator {
    /// Create an orchestrator staging files in the system temp dir
    pub fn new(connector: Arc<dyn ProviderConnector>, settings: UploadConfig) -> Self {
        Self {
            connector,
            settings,
            staging_dir: std::env::temp_dir(),
        }
    }

    /// Stage uploads in `dir` instead of the system temp dir
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    /// Upload, wait for indexing and return the indexed document.
    ///
    /// The staged temp file is removed whatever the outcome.
    pub async fn run(&self, request: UploadRequest) -> Result<DocumentDescriptor> {
        tracing::info!(
            "Upload request: store={} display_name={} size={} bytes",
            request.store,
            request.display_name,
            request.data.len()
        );

        let staged = StagedFile::write_in(&self.staging_dir, &request.data, &request.file_suffix())?;
        let result = self.index(&request, staged.path()).await;
        staged.cleanup();

        if let Ok(document) = &result {
            tracing::info!("File added to store {}: {}", request.store, document.name);
        }
        result
    }

    async fn index(&self, request: &UploadRequest, file: &Path) -> Result<DocumentDescriptor> {
        let provider = self
            .connector
            .connect(&request.api_key, request.proxy_url.as_deref())?;

        let max_wait = self.settings.max_wait();
        let operation = timeout(
            max_wait,
            provider.upload_to_store(file, &request.store, &request.display_name),
        )
        .await
        .map_err(|_| {
            tracing::warn!(
                "Upload to {} stalled for {}s, giving up",
                request.store,
                max_wait.as_secs()
            );
            Error::Timeout
        })??;
        tracing::info!("Upload started, waiting for indexing ({})", operation.name);

        let operation = self.wait_for_completion(provider.as_ref(), operation).await?;

        if let Some(status) = &operation.error {
            return Err(Error::provider(status.describe()));
        }

        if let Some(document) = extract_document(operation.response.as_ref()) {
            return Ok(document);
        }

        tracing::debug!("Operation result had no document, listing store instead");
        self.find_in_listing(provider.as_ref(), &request.store, &request.display_name)
            .await
            .ok_or(Error::ExtractionFailed)
    }

    /// Poll `operation` every `poll_interval` until it reports done.
    ///
    /// Fails with [`Error::Timeout`] once `max_wait` has elapsed since the
    /// submission returned, including while a poll request is in flight.
    async fn wait_for_completion(
        &self,
        provider: &dyn FileSearchProvider,
        operation: Operation,
    ) -> Result<Operation> {
        let max_wait = self.settings.max_wait();
        let name = operation.name.clone();

        match timeout(max_wait, self.poll_until_done(provider, operation)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "Indexing of {} still running after {}s, giving up",
                    name,
                    max_wait.as_secs()
                );
                Err(Error::Timeout)
            }
        }
    }

    async fn poll_until_done(
        &self,
        provider: &dyn FileSearchProvider,
        mut operation: Operation,
    ) -> Result<Operation> {
        let start = Instant::now();
        let interval = self.settings.poll_interval();

        while !operation.done {
            sleep(interval).await;
            operation = provider.get_operation(&operation).await?;
            tracing::info!("Indexing... ({:.0}s elapsed)", start.elapsed().as_secs_f64());
        }

        Ok(operation)
    }

    /// Fallback lookup; listing failures count as "not found"
    async fn find_in_listing(
        &self,
        provider: &dyn FileSearchProvider,
        store: &StoreName,
        hint: &str,
    ) -> Option<DocumentDescriptor> {
        match provider.list_documents(store, self.settings.list_page_size).await {
            Ok(docs) => select_from_listing(&docs, hint),
            Err(e) => {
                tracing::warn!("Fallback list documents failed: {}", e);
                None
            }
        }
    }
}
