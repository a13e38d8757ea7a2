//! file-search-relay: upload relay for Gemini file-search stores
//!
//! Accepts a multipart document upload, forwards it to a file-search store,
//! waits for the long-running indexing operation to finish and answers with a
//! normalized document descriptor. The same orchestration backs two transport
//! bindings: a standalone axum server and a single-handler serverless function.

pub mod config;
pub mod error;
pub mod function;
pub mod ingestion;
pub mod processing;
pub mod providers;
pub mod server;
pub mod types;

pub use config::RelayConfig;
pub use error::{Error, Result};
pub use processing::UploadOrchestrator;
pub use types::{
    document::{DocumentDescriptor, OperationResult, RawDocument},
    request::{StoreName, UploadRequest},
};
