#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
};
use file_search_relay::config::RelayConfig;
use file_search_relay::error::{Error, Result};
use file_search_relay::providers::{FileSearchProvider, ProviderConnector};
use file_search_relay::server::AppState;
use file_search_relay::types::{Operation, RawDocument, StoreName};
use file_search_relay::UploadOrchestrator;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;

pub const BOUNDARY: &str = "relay-test-boundary";

/// What the mock provider answers with
#[derive(Clone, Default)]
pub struct Script {
    /// Operation returned by the upload call
    pub initial: Operation,
    /// Operation returned by every poll
    pub poll: Option<Operation>,
    /// Listing for the fallback lookup; `None` makes listing fail
    pub listing: Option<Vec<RawDocument>>,
    /// Error message returned by the upload call
    pub upload_error: Option<String>,
}

/// Calls observed by the mock provider
#[derive(Default)]
pub struct Calls {
    pub api_keys: Vec<String>,
    pub proxies: Vec<Option<String>>,
    pub stores: Vec<String>,
    pub display_names: Vec<String>,
    pub staged_paths: Vec<PathBuf>,
    pub staged_bytes: Vec<Vec<u8>>,
}

pub struct MockProvider {
    script: Script,
    calls: Arc<Mutex<Calls>>,
}

#[async_trait]
impl FileSearchProvider for MockProvider {
    async fn upload_to_store(
        &self,
        file: &Path,
        store: &StoreName,
        display_name: &str,
    ) -> Result<Operation> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.stores.push(store.to_string());
            calls.display_names.push(display_name.to_string());
            calls.staged_paths.push(file.to_path_buf());
            calls.staged_bytes.push(std::fs::read(file)?);
        }
        match &self.script.upload_error {
            Some(message) => Err(Error::provider(message.clone())),
            None => Ok(self.script.initial.clone()),
        }
    }

    async fn get_operation(&self, operation: &Operation) -> Result<Operation> {
        Ok(self.script.poll.clone().unwrap_or_else(|| operation.clone()))
    }

    async fn list_documents(&self, _store: &StoreName, _page_size: u32) -> Result<Vec<RawDocument>> {
        self.script
            .listing
            .clone()
            .ok_or_else(|| Error::provider("listing failed"))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

pub struct MockConnector {
    pub script: Script,
    pub calls: Arc<Mutex<Calls>>,
}

impl ProviderConnector for MockConnector {
    fn connect(&self, api_key: &str, proxy_url: Option<&str>) -> Result<Arc<dyn FileSearchProvider>> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.api_keys.push(api_key.to_string());
            calls.proxies.push(proxy_url.map(str::to_string));
        }
        Ok(Arc::new(MockProvider {
            script: self.script.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }
}

/// App state wired to a mock provider, staging into its own temp dir
pub struct TestApp {
    pub state: AppState,
    pub calls: Arc<Mutex<Calls>>,
    pub staging: TempDir,
}

impl TestApp {
    pub fn new(script: Script) -> Self {
        let staging = TempDir::new().expect("staging dir must be created");
        let calls = Arc::new(Mutex::new(Calls::default()));
        let connector = Arc::new(MockConnector {
            script,
            calls: Arc::clone(&calls),
        });
        let config = RelayConfig::default();
        let orchestrator = UploadOrchestrator::new(connector, config.upload.clone())
            .with_staging_dir(staging.path());
        let state = AppState::with_orchestrator(config, orchestrator);
        Self {
            state,
            calls,
            staging,
        }
    }

    /// Number of files left in the staging dir
    pub fn staged_file_count(&self) -> usize {
        std::fs::read_dir(self.staging.path())
            .expect("staging dir must be readable")
            .count()
    }
}

pub fn pending_operation() -> Operation {
    Operation {
        name: "fileSearchStores/docs/upload/operations/op-1".to_string(),
        ..Default::default()
    }
}

pub fn done_operation(response: Value) -> Operation {
    Operation {
        done: true,
        response: Some(response),
        ..pending_operation()
    }
}

/// Multipart form builder
#[derive(Default)]
pub struct Form {
    body: Vec<u8>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, filename: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// The usual valid upload form
pub fn standard_form() -> Form {
    Form::new()
        .text("storeName", "docs")
        .text("apiKey", "test-key")
        .file("guide.pdf", b"%PDF-1.4 guide")
}

pub fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .expect("request builder must not fail")
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("response body must be readable")
        .to_bytes();
    let text = std::str::from_utf8(bytes.as_ref()).unwrap_or("<non-utf8>");
    serde_json::from_slice(bytes.as_ref())
        .unwrap_or_else(|err| panic!("invalid json: {err}; body={text}"))
}
