//! Gemini file-search API provider

pub mod client;
pub mod transport;

pub use client::{GeminiConnector, GeminiFileSearchClient};
pub use transport::TransportSettings;
