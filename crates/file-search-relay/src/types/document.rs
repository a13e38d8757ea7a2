//! Document and long-running operation types
//!
//! The provider does not pin down the shape of a finished upload operation's
//! result. [`OperationResult`] names the shapes seen in practice and fixes the
//! order in which they are tried.

use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::ApiStatus;

/// Normalized descriptor returned to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDescriptor {
    /// Canonical resource path, e.g. `fileSearchStores/x/documents/1`
    pub name: String,
    /// Human label
    pub display_name: String,
}

impl DocumentDescriptor {
    /// Build a descriptor from a provider document.
    ///
    /// Returns `None` when the document has no usable name. A missing display
    /// name defaults to the last segment of the resource path.
    pub fn from_raw(raw: &RawDocument) -> Option<Self> {
        let name = raw.name()?;
        let display_name = match raw.display_name() {
            Some(display) => display.to_string(),
            None => last_segment(name).to_string(),
        };
        Some(Self {
            name: name.to_string(),
            display_name,
        })
    }
}

/// Callers read either casing, so both are emitted.
impl Serialize for DocumentDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DocumentDescriptor", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("displayName", &self.display_name)?;
        state.serialize_field("display_name", &self.display_name)?;
        state.end()
    }
}

fn last_segment(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Document as the provider returns it, in any of its casings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "documentName")]
    pub document_name: Option<String>,
    #[serde(default, rename = "displayName")]
    pub display_name_camel: Option<String>,
    #[serde(default, rename = "display_name")]
    pub display_name_snake: Option<String>,
    #[serde(default, rename = "createTime")]
    pub create_time: Option<String>,
}

impl RawDocument {
    /// Resource name, from `name` or `documentName`
    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name).or_else(|| non_empty(&self.document_name))
    }

    /// Display name, from `display_name` or `displayName`
    pub fn display_name(&self) -> Option<&str> {
        non_empty(&self.display_name_snake).or_else(|| non_empty(&self.display_name_camel))
    }

    /// True if either casing of the display name equals `hint`
    pub fn has_display_name(&self, hint: &str) -> bool {
        self.display_name_camel.as_deref() == Some(hint)
            || self.display_name_snake.as_deref() == Some(hint)
    }

    /// Creation timestamp as the provider formats it (RFC 3339)
    pub fn create_time(&self) -> &str {
        self.create_time.as_deref().unwrap_or("")
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Shapes of a completed upload operation's result, in precedence order
#[derive(Debug, Clone)]
pub enum OperationResult {
    /// `{"document": {...}}`
    Document(RawDocument),
    /// `{"documents": [{...}, ...]}` with at least one entry
    Listing(Vec<RawDocument>),
    /// The result object is itself the document
    Bare(RawDocument),
}

impl OperationResult {
    /// Classify a result payload. Non-object payloads yield `None`.
    pub fn classify(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        if let Some(doc) = object.get("document").and_then(parse_document) {
            return Some(Self::Document(doc));
        }

        if let Some(Value::Array(items)) = object.get("documents") {
            let docs: Vec<RawDocument> = items.iter().filter_map(parse_document).collect();
            if !docs.is_empty() {
                return Some(Self::Listing(docs));
            }
        }

        parse_document(value).map(Self::Bare)
    }

    /// The document this result points at
    pub fn candidate(&self) -> Option<&RawDocument> {
        match self {
            Self::Document(doc) | Self::Bare(doc) => Some(doc),
            Self::Listing(docs) => docs.first(),
        }
    }
}

fn parse_document(value: &Value) -> Option<RawDocument> {
    match value {
        Value::Object(map) if !map.is_empty() => serde_json::from_value(value.clone()).ok(),
        _ => None,
    }
}

/// Long-running operation handle
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Operation {
    /// Operation resource name, used for polling
    #[serde(default)]
    pub name: String,
    /// Completion flag
    #[serde(default)]
    pub done: bool,
    /// Result payload once done
    #[serde(default)]
    pub response: Option<Value>,
    /// Failure status once done
    #[serde(default)]
    pub error: Option<ApiStatus>,
}

/// Page of a store's document listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<RawDocument>,
    #[serde(default, rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}
