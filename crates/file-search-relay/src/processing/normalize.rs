//! Response normalization and fallback document selection

use serde_json::Value;

use crate::types::{DocumentDescriptor, OperationResult, RawDocument};

/// Extract a descriptor from a completed operation's result payload.
///
/// Returns `None` when the payload has no recognizable shape or the chosen
/// candidate has no name; the caller then falls back to a listing.
pub fn extract_document(result: Option<&Value>) -> Option<DocumentDescriptor> {
    let shape = OperationResult::classify(result?)?;
    DocumentDescriptor::from_raw(shape.candidate()?)
}

/// Pick the uploaded document out of a store listing.
///
/// An exact display-name match on `hint` wins; otherwise the most recently
/// created entry (greatest `createTime`) is returned. Ties keep the entry
/// listed first. Entries without a name are ignored.
pub fn select_from_listing(docs: &[RawDocument], hint: &str) -> Option<DocumentDescriptor> {
    let named: Vec<&RawDocument> = docs.iter().filter(|d| d.name().is_some()).collect();

    if !hint.is_empty() {
        if let Some(doc) = named.iter().find(|d| d.has_display_name(hint)) {
            return DocumentDescriptor::from_raw(doc);
        }
    }

    let mut newest: Option<&RawDocument> = None;
    for doc in named {
        match newest {
            Some(current) if doc.create_time() <= current.create_time() => {}
            _ => newest = Some(doc),
        }
    }

    newest.and_then(DocumentDescriptor::from_raw)
}
