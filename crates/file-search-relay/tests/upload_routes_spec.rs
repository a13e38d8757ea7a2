mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use file_search_relay::server::build_router;
use serde_json::json;
use tower::ServiceExt;

use common::{
    done_operation, json_body, pending_operation, standard_form, upload_request, Form, Script,
    TestApp,
};

const UPLOAD_URI: &str = "/api/upload-document";

#[tokio::test]
async fn health_returns_ok_json() {
    let app = TestApp::new(Script::default());
    let response = build_router(app.state.clone())
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/health")
                .body(Body::empty())
                .expect("request builder must not fail"),
        )
        .await
        .expect("health handler should respond");

    assert_eq!(response.status(), StatusCode::OK);
    let value = json_body(response).await;
    assert_eq!(value["status"], json!("ok"));
    assert!(value["message"].is_string());
}

#[tokio::test]
async fn upload_returns_normalized_document() {
    let app = TestApp::new(Script {
        initial: done_operation(json!({
            "document": {"name": "fileSearchStores/docs/documents/1", "displayName": "Guide"}
        })),
        ..Default::default()
    });

    let form = Form::new()
        .text("storeName", "docs")
        .text("apiKey", "test-key")
        .text("displayName", "  Guide: <v2>  ")
        .text("proxyUrl", "http://proxy.internal:3128")
        .file("guide.pdf", b"%PDF-1.4 guide");
    let response = build_router(app.state.clone())
        .oneshot(upload_request(UPLOAD_URI, form.finish()))
        .await
        .expect("upload handler should respond");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "name": "fileSearchStores/docs/documents/1",
            "displayName": "Guide",
            "display_name": "Guide"
        })
    );

    let calls = app.calls.lock().unwrap();
    assert_eq!(calls.api_keys, vec!["test-key".to_string()]);
    assert_eq!(calls.proxies, vec![Some("http://proxy.internal:3128".to_string())]);
    assert_eq!(calls.stores, vec!["fileSearchStores/docs".to_string()]);
    assert_eq!(calls.display_names, vec!["Guide v2".to_string()]);
    assert_eq!(calls.staged_bytes, vec![b"%PDF-1.4 guide".to_vec()]);
    assert!(calls.staged_paths[0].to_string_lossy().ends_with(".pdf"));
    drop(calls);
    assert_eq!(app.staged_file_count(), 0);
}

#[tokio::test]
async fn prefixed_store_name_is_left_alone() {
    let app = TestApp::new(Script {
        initial: done_operation(json!({"documentName": "fileSearchStores/docs/documents/2"})),
        ..Default::default()
    });

    let form = Form::new()
        .text("storeName", "fileSearchStores/docs")
        .text("apiKey", "test-key")
        .file("notes.md", b"# Notes");
    let response = build_router(app.state.clone())
        .oneshot(upload_request(UPLOAD_URI, form.finish()))
        .await
        .expect("upload handler should respond");

    assert_eq!(response.status(), StatusCode::OK);
    let value = json_body(response).await;
    assert_eq!(value["displayName"], json!("2"));
    assert_eq!(
        app.calls.lock().unwrap().stores,
        vec!["fileSearchStores/docs".to_string()]
    );
}

#[tokio::test]
async fn fallback_listing_picks_newest_document() {
    let listing = serde_json::from_value(json!([
        {"name": "fileSearchStores/docs/documents/1", "displayName": "A", "createTime": "2025-03-01T10:00:00Z"},
        {"name": "fileSearchStores/docs/documents/2", "displayName": "B", "createTime": "2025-03-01T10:05:00Z"}
    ]))
    .unwrap();
    let app = TestApp::new(Script {
        initial: done_operation(json!({"mimeType": "application/pdf"})),
        listing: Some(listing),
        ..Default::default()
    });

    let response = build_router(app.state.clone())
        .oneshot(upload_request(UPLOAD_URI, standard_form().finish()))
        .await
        .expect("upload handler should respond");

    assert_eq!(response.status(), StatusCode::OK);
    let value = json_body(response).await;
    assert_eq!(value["name"], json!("fileSearchStores/docs/documents/2"));
    assert_eq!(value["display_name"], json!("B"));
}

#[tokio::test]
async fn unrecognized_result_without_listing_is_500() {
    let app = TestApp::new(Script {
        initial: done_operation(json!({})),
        listing: None,
        ..Default::default()
    });

    let response = build_router(app.state.clone())
        .oneshot(upload_request(UPLOAD_URI, standard_form().finish()))
        .await
        .expect("upload handler should respond");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Upload completed but could not extract document info"})
    );
    assert_eq!(app.staged_file_count(), 0);
}

#[tokio::test]
async fn provider_error_message_is_relayed() {
    let app = TestApp::new(Script {
        upload_error: Some("API key not valid. Please pass a valid API key.".to_string()),
        ..Default::default()
    });

    let response = build_router(app.state.clone())
        .oneshot(upload_request(UPLOAD_URI, standard_form().finish()))
        .await
        .expect("upload handler should respond");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({"error": "API key not valid. Please pass a valid API key."})
    );
    assert_eq!(app.staged_file_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn indexing_timeout_is_504() {
    let app = TestApp::new(Script {
        initial: pending_operation(),
        poll: Some(pending_operation()),
        ..Default::default()
    });

    let response = build_router(app.state.clone())
        .oneshot(upload_request(UPLOAD_URI, standard_form().finish()))
        .await
        .expect("upload handler should respond");

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Indexing timeout - processing took too long"})
    );
    assert_eq!(app.staged_file_count(), 0);
}

#[tokio::test]
async fn missing_file_is_400() {
    let app = TestApp::new(Script::default());
    let form = Form::new()
        .text("storeName", "docs")
        .text("apiKey", "test-key");

    let response = build_router(app.state.clone())
        .oneshot(upload_request(UPLOAD_URI, form.finish()))
        .await
        .expect("upload handler should respond");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({"error": "No file provided"}));
}

#[tokio::test]
async fn missing_credentials_is_400_with_combined_message() {
    let app = TestApp::new(Script::default());
    let form = Form::new()
        .text("storeName", "docs")
        .file("guide.pdf", b"%PDF");

    let response = build_router(app.state.clone())
        .oneshot(upload_request(UPLOAD_URI, form.finish()))
        .await
        .expect("upload handler should respond");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Missing required parameters: storeName and apiKey are required"})
    );
    assert!(app.calls.lock().unwrap().api_keys.is_empty());
}

#[tokio::test]
async fn disallowed_extensions_are_400() {
    for filename in ["slides.pptx", "data.csv", "photo.JPG", "script.md.exe"] {
        let app = TestApp::new(Script::default());
        let form = Form::new()
            .text("storeName", "docs")
            .text("apiKey", "test-key")
            .file(filename, b"payload");

        let response = build_router(app.state.clone())
            .oneshot(upload_request(UPLOAD_URI, form.finish()))
            .await
            .expect("upload handler should respond");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{filename}");
        assert_eq!(
            json_body(response).await,
            json!({"error": "File type not allowed. Allowed: .pdf, .md"})
        );
    }
}

#[tokio::test]
async fn uppercase_extension_is_accepted() {
    let app = TestApp::new(Script {
        initial: done_operation(json!({"document": {"name": "fileSearchStores/docs/documents/9"}})),
        ..Default::default()
    });
    let form = Form::new()
        .text("storeName", "docs")
        .text("apiKey", "test-key")
        .file("REPORT.PDF", b"%PDF");

    let response = build_router(app.state.clone())
        .oneshot(upload_request(UPLOAD_URI, form.finish()))
        .await
        .expect("upload handler should respond");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_multipart_body_is_400() {
    let app = TestApp::new(Script::default());
    let request = Request::builder()
        .method("POST")
        .uri(UPLOAD_URI)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"storeName":"docs"}"#))
        .expect("request builder must not fail");

    let response = build_router(app.state.clone())
        .oneshot(request)
        .await
        .expect("upload handler should respond");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"error": "No file provided or invalid Content-Type"})
    );
}

#[tokio::test]
async fn preflight_is_204_with_permissive_cors() {
    let app = TestApp::new(Script::default());
    let request = Request::builder()
        .method("OPTIONS")
        .uri(UPLOAD_URI)
        .header(header::ORIGIN, "https://app.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .expect("request builder must not fail");

    let response = build_router(app.state.clone())
        .oneshot(request)
        .await
        .expect("preflight should respond");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
