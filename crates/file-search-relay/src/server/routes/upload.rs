//! Document upload endpoint

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::HeaderMap,
    Json,
};

use crate::error::{Error, Result};
use crate::ingestion::{check_upload_headers, UploadForm, INVALID_BODY_MESSAGE};
use crate::server::state::AppState;
use crate::types::DocumentDescriptor;

/// POST /api/upload-document - Upload a file into a file-search store
pub async fn upload_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<DocumentDescriptor>> {
    check_upload_headers(&headers, false)?;
    let multipart = multipart.map_err(|e| {
        tracing::debug!("Rejected upload body: {}", e);
        Error::validation(INVALID_BODY_MESSAGE)
    })?;

    let request = UploadForm::read(multipart).await?.validate()?;
    let document = state.orchestrator().run(request).await?;

    Ok(Json(document))
}
