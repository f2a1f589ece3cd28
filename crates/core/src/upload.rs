//! Client-side upload validation.
//!
//! The extension allow-list is checked before any network interaction; an
//! unsupported file never produces an `upload` event.

/// File extensions the ingestion backend accepts.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "docx"];

/// Rejection for a filename outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Only .txt, .pdf, and .docx files are supported.")]
pub struct UnsupportedFileType;

/// Checks a filename against [`ALLOWED_EXTENSIONS`], case-insensitively.
pub fn validate_filename(filename: &str) -> Result<(), UnsupportedFileType> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(UnsupportedFileType),
    }
}
