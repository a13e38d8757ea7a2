//! Provider abstractions for the external file-search API
//!
//! The orchestrator only sees [`FileSearchProvider`]; the Gemini REST client
//! is the production implementation, tests plug in their own.

pub mod file_search;
pub mod gemini;

pub use file_search::{FileSearchProvider, ProviderConnector};
pub use gemini::{GeminiConnector, GeminiFileSearchClient, TransportSettings};
