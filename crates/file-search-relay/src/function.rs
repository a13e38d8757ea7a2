//! Serverless-function binding
//!
//! A single catch-all handler in the shape a function host invokes: it sees
//! every method and path, answers CORS preflights itself and only accepts
//! `POST /api/upload-document`. Uploads go through the same orchestrator as
//! the standalone server.

use axum::{
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};

use crate::error::{Error, Result};
use crate::ingestion::{check_upload_headers, UploadForm, INVALID_BODY_MESSAGE};
use crate::server::AppState;

/// Path the function answers on; hosts may prefix it
pub const UPLOAD_PATH: &str = "/api/upload-document";

/// Router that sends every request to [`handle`]
pub fn build_function_router(state: AppState) -> Router {
    let max_upload_size = state.config().server.max_upload_size;
    Router::new()
        .fallback(handle)
        .layer(DefaultBodyLimit::max(max_upload_size))
        .with_state(state)
}

/// Function entry point
pub async fn handle(State(state): State<AppState>, request: Request) -> Response {
    let mut response = match dispatch(&state, request).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    };
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

async fn dispatch(state: &AppState, request: Request) -> Result<Response> {
    if request.method() == Method::OPTIONS {
        return Ok(preflight());
    }
    if request.method() != Method::POST {
        return Err(Error::MethodNotAllowed);
    }
    if !request.uri().path().contains(UPLOAD_PATH) {
        return Err(Error::NotFound);
    }

    check_upload_headers(request.headers(), true)?;
    let multipart = Multipart::from_request(request, &())
        .await
        .map_err(|_| Error::validation(INVALID_BODY_MESSAGE))?;

    let upload = UploadForm::read(multipart).await?.validate()?;
    let document = state.orchestrator().run(upload).await?;

    Ok(Json(document).into_response())
}

fn preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
        .into_response()
}
