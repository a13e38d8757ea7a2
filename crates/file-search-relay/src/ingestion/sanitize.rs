//! Filename checks and display-name sanitizing
//!
//! Non-Latin scripts pass through untouched; only path separators, NUL and
//! the characters reserved on common filesystems are removed.

use std::path::Path;

/// Extensions the file-search store accepts through this relay
pub const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".md"];

/// Fallback when nothing usable is left of a display name
const FALLBACK_NAME: &str = "file";

/// Check the filename's extension against [`ALLOWED_EXTENSIONS`],
/// ignoring case.
pub fn is_allowed_file(filename: &str) -> bool {
    match Path::new(filename).extension().and_then(|e| e.to_str()) {
        Some(ext) => {
            let ext = format!(".{}", ext.to_lowercase());
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Sanitize a user-supplied display name.
///
/// Never returns an empty string and never returns any of
/// `/ \ NUL < > : " | ? *`.
pub fn sanitize_display_name(name: &str) -> String {
    if name.trim().is_empty() {
        return FALLBACK_NAME.to_string();
    }

    let without_separators: String = name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '\0'))
        .collect();

    let cleaned: String = without_separators
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '|' | '?' | '*'))
        .collect();

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}
