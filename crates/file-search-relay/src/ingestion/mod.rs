//! Upload intake: multipart form parsing, validation, name sanitizing and
//! temp-file staging

pub mod form;
pub mod sanitize;
pub mod staging;

pub use form::{check_upload_headers, FilePart, UploadForm, INVALID_BODY_MESSAGE};
pub use sanitize::{is_allowed_file, sanitize_display_name, ALLOWED_EXTENSIONS};
pub use staging::StagedFile;
