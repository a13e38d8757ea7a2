//! Multipart upload form

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::{header, HeaderMap, StatusCode};
use bytes::Bytes;

use super::sanitize::{is_allowed_file, sanitize_display_name, ALLOWED_EXTENSIONS};
use crate::error::{Error, Result};
use crate::types::{StoreName, UploadRequest};

/// Message for a missing, empty or non-multipart body
pub const INVALID_BODY_MESSAGE: &str = "No file provided or invalid Content-Type";

/// Reject requests that cannot carry an upload before touching the body.
///
/// The content type must be `multipart/form-data` and a declared
/// `Content-Length` must be positive. With `require_length`, a missing
/// `Content-Length` is rejected too.
pub fn check_upload_headers(headers: &HeaderMap, require_length: bool) -> Result<()> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !content_type.contains("multipart/form-data") {
        return Err(Error::validation(INVALID_BODY_MESSAGE));
    }

    let content_length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().parse::<u64>().unwrap_or(0));
    match content_length {
        Some(0) => Err(Error::validation(INVALID_BODY_MESSAGE)),
        None if require_length => Err(Error::validation(INVALID_BODY_MESSAGE)),
        _ => Ok(()),
    }
}

/// The `file` part of the form
#[derive(Debug, Clone, Default)]
pub struct FilePart {
    /// Filename from the part's content disposition, empty if none was sent
    pub filename: String,
    pub data: Bytes,
}

/// Raw, unvalidated upload form
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub file: Option<FilePart>,
    pub store_name: Option<String>,
    pub api_key: Option<String>,
    pub display_name: Option<String>,
    pub proxy_url: Option<String>,
}

impl UploadForm {
    /// Collect the relay's fields from a multipart stream.
    ///
    /// Unknown fields are skipped. Only the first `file` part is kept.
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| read_error("Failed to read multipart field", e))?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == "file" {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| read_error("Failed to read file", e))?;
                if form.file.is_none() {
                    form.file = Some(FilePart { filename, data });
                }
                continue;
            }

            let slot = match name.as_str() {
                "storeName" => &mut form.store_name,
                "apiKey" => &mut form.api_key,
                "displayName" => &mut form.display_name,
                "proxyUrl" => &mut form.proxy_url,
                _ => continue,
            };
            let value = field
                .text()
                .await
                .map_err(|e| read_error("Failed to read form field", e))?;
            *slot = Some(value);
        }

        Ok(form)
    }

    /// Validate in order: file present, required parameters, filename,
    /// extension. The first failure wins.
    pub fn validate(self) -> Result<UploadRequest> {
        let file = self
            .file
            .ok_or_else(|| Error::validation("No file provided"))?;

        let (store_name, api_key) = match (non_blank(self.store_name), non_blank(self.api_key)) {
            (Some(store), Some(key)) => (store, key),
            _ => {
                return Err(Error::validation(
                    "Missing required parameters: storeName and apiKey are required",
                ))
            }
        };

        if file.filename.trim().is_empty() {
            return Err(Error::validation("No file selected"));
        }

        if !is_allowed_file(&file.filename) {
            return Err(Error::validation(format!(
                "File type not allowed. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }

        let display_source = match self.display_name.as_deref() {
            Some(display) if !display.is_empty() => display,
            _ => file.filename.as_str(),
        };

        Ok(UploadRequest {
            display_name: sanitize_display_name(display_source),
            data: file.data,
            filename: file.filename,
            store: StoreName::new(store_name),
            api_key,
            proxy_url: non_blank(self.proxy_url),
        })
    }
}

fn read_error(context: &str, err: MultipartError) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge
    } else {
        Error::validation(format!("{}: {}", context, err.body_text()))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
