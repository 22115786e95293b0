//! Upload validation for files attached to an analysis.
//!
//! Validation never fails: it returns a `FileValidation` describing the
//! outcome so callers can report it inline before any network call.

use serde::{Deserialize, Serialize};

/// Default upload size limit in megabytes
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 10;

/// MIME types accepted for upload
pub const ALLOWED_MIME_TYPES: [&str; 7] = [
    "text/plain",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/json",
    "text/xml",
    "text/csv",
];

pub const UNSUPPORTED_TYPE_ERROR: &str =
    "File type not supported. Please upload TXT, PDF, DOC, DOCX, JSON, XML, or CSV files.";

/// Title prefix given to analyses started from a file
pub const FILE_UPLOAD_TITLE_PREFIX: &str = "File Upload:";

/// Metadata of a file chosen for upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// File name without directories
    pub name: String,
    pub mime_type: String,
    /// Size in bytes
    pub size: u64,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }

    /// Title suggested for an analysis started from this file
    pub fn suggested_title(&self) -> String {
        format!("{} {}", FILE_UPLOAD_TITLE_PREFIX, self.name)
    }
}

/// Outcome of `validate_file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn rejected(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}

/// Check type against the allow-list, then size against `max_size_in_mb`
pub fn validate_file(file: &UploadedFile, max_size_in_mb: u64) -> FileValidation {
    if !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return FileValidation::rejected(UNSUPPORTED_TYPE_ERROR);
    }

    let max_size = max_size_in_mb.saturating_mul(1024 * 1024);
    if file.size > max_size {
        return FileValidation::rejected(format!("File size exceeds {}MB limit.", max_size_in_mb));
    }

    FileValidation::ok()
}
