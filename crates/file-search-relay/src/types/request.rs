//! Validated upload request types

use bytes::Bytes;
use std::fmt;

/// Resource prefix every file-search store name carries
pub const STORE_PREFIX: &str = "fileSearchStores/";

/// File-search store resource name, always `fileSearchStores/<id>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreName(String);

impl StoreName {
    /// Normalize a caller-supplied store identifier, adding the prefix when
    /// it is missing. Already-prefixed names are left unchanged.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.starts_with(STORE_PREFIX) {
            Self(raw)
        } else {
            Self(format!("{}{}", STORE_PREFIX, raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated upload, ready for the orchestrator
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Raw file bytes
    pub data: Bytes,
    /// Original filename as sent by the client
    pub filename: String,
    /// Target store
    pub store: StoreName,
    /// API key for the file-search provider
    pub api_key: String,
    /// Sanitized display name used at upload time
    pub display_name: String,
    /// Per-request proxy, overrides the process-wide one
    pub proxy_url: Option<String>,
}

impl UploadRequest {
    /// Suffix for the staged temp file, keeping the original casing
    pub fn file_suffix(&self) -> String {
        std::path::Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default()
    }
}
