//! Upload orchestration: submit, poll, normalize, fall back

pub mod normalize;
pub mod orchestrator;

pub use normalize::{extract_document, select_from_listing};
pub use orchestrator::UploadOrchestrator;
