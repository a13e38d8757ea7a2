//! Gemini file-search REST client
//!
//! Uploads use the resumable upload protocol: a `start` call carrying the
//! document metadata returns a session URL, and a single `upload, finalize`
//! call sends the bytes and returns the import operation.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::transport::TransportSettings;
use crate::config::UploadConfig;
use crate::error::{Error, Result};
use crate::providers::file_search::{FileSearchProvider, ProviderConnector};
use crate::types::{ListDocumentsResponse, Operation, RawDocument, StoreName};

const API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";
const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// Gemini file-search client bound to one API key
pub struct GeminiFileSearchClient {
    http: Client,
    api_key: String,
    base_url: String,
    list_timeout: Duration,
}

impl GeminiFileSearchClient {
    /// Create a client
    ///
    /// # Arguments
    /// * `http` - Configured HTTP client (proxy, certificates)
    /// * `api_key` - Gemini API key
    /// * `base_url` - API root, e.g. "https://generativelanguage.googleapis.com"
    pub fn new(http: Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            list_timeout: Duration::from_secs(30),
        }
    }

    /// Set the timeout for document listings
    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self
    }

    fn upload_endpoint(&self, store: &StoreName) -> String {
        format!(
            "{}/upload/{}/{}:uploadToFileSearchStore",
            self.base_url, API_VERSION, store
        )
    }

    fn resource_endpoint(&self, resource: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_VERSION, resource)
    }
}

/// Turn a non-success response into a provider error
async fn check_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(Error::from_api_response(status, &body))
}

#[derive(Serialize)]
struct UploadMetadata<'a> {
    #[serde(rename = "displayName")]
    display_name: &'a str,
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
}

#[async_trait]
impl FileSearchProvider for GeminiFileSearchClient {
    async fn upload_to_store(
        &self,
        file: &Path,
        store: &StoreName,
        display_name: &str,
    ) -> Result<Operation> {
        let data = tokio::fs::read(file).await?;
        let mime_type = mime_guess::from_path(file)
            .first_or_octet_stream()
            .to_string();

        tracing::debug!(
            "Starting resumable upload to {} ({} bytes, {})",
            store,
            data.len(),
            mime_type
        );

        let start = self
            .http
            .post(self.upload_endpoint(store))
            .header(API_KEY_HEADER, &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", data.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", &mime_type)
            .json(&UploadMetadata {
                display_name,
                mime_type: &mime_type,
            })
            .send()
            .await?;
        let start = check_status(start).await?;

        let session_url = start
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| Error::provider("Upload session URL missing from response"))?;

        let finalize = self
            .http
            .post(session_url)
            .header(API_KEY_HEADER, &self.api_key)
            .header("X-Goog-Upload-Command", "upload, finalize")
            .header("X-Goog-Upload-Offset", "0")
            .body(data)
            .send()
            .await?;
        let finalize = check_status(finalize).await?;

        Ok(finalize.json::<Operation>().await?)
    }

    async fn get_operation(&self, operation: &Operation) -> Result<Operation> {
        if operation.name.is_empty() {
            return Err(Error::provider("Operation has no name to poll"));
        }

        let response = self
            .http
            .get(self.resource_endpoint(&operation.name))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let response = check_status(response).await?;

        Ok(response.json::<Operation>().await?)
    }

    async fn list_documents(&self, store: &StoreName, page_size: u32) -> Result<Vec<RawDocument>> {
        let response = self
            .http
            .get(self.resource_endpoint(&format!("{}/documents", store)))
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("pageSize", page_size)])
            .timeout(self.list_timeout)
            .send()
            .await?;
        let response = check_status(response).await?;

        let page: ListDocumentsResponse = response.json().await?;
        Ok(page.documents)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Connects [`GeminiFileSearchClient`]s using the process-wide transport
/// settings
pub struct GeminiConnector {
    transport: TransportSettings,
    base_url: String,
    list_timeout: Duration,
}

impl GeminiConnector {
    pub fn new(transport: TransportSettings, upload: &UploadConfig) -> Self {
        Self {
            transport,
            base_url: upload.api_base_url.clone(),
            list_timeout: upload.list_timeout(),
        }
    }
}

impl ProviderConnector for GeminiConnector {
    fn connect(
        &self,
        api_key: &str,
        proxy_url: Option<&str>,
    ) -> Result<Arc<dyn FileSearchProvider>> {
        let http = self.transport.build_client(proxy_url)?;
        let client = GeminiFileSearchClient::new(http, api_key, self.base_url.clone())
            .with_list_timeout(self.list_timeout);
        Ok(Arc::new(client))
    }
}
