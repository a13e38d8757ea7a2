//! File-search provider traits

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::types::{Operation, RawDocument, StoreName};

/// Client for one file-search account, bound to an API key
///
/// Implementations:
/// - `GeminiFileSearchClient`: Gemini API over REST
#[async_trait]
pub trait FileSearchProvider: Send + Sync {
    /// Upload the file at `file` into `store` and start indexing it.
    ///
    /// Returns the long-running operation tracking the import.
    async fn upload_to_store(
        &self,
        file: &Path,
        store: &StoreName,
        display_name: &str,
    ) -> Result<Operation>;

    /// Re-fetch the current state of an operation
    async fn get_operation(&self, operation: &Operation) -> Result<Operation>;

    /// Read one page of the store's document listing
    async fn list_documents(&self, store: &StoreName, page_size: u32) -> Result<Vec<RawDocument>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Creates providers bound to a caller's credentials
pub trait ProviderConnector: Send + Sync {
    /// Bind a provider to `api_key`, routing through `proxy_url` when given
    fn connect(&self, api_key: &str, proxy_url: Option<&str>)
        -> Result<Arc<dyn FileSearchProvider>>;
}
