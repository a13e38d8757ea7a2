//! Core types for the upload relay

pub mod document;
pub mod request;

pub use document::{
    DocumentDescriptor, ListDocumentsResponse, Operation, OperationResult, RawDocument,
};
pub use request::{StoreName, UploadRequest};
