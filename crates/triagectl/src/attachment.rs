//! Local files attached to an analysis

use std::io;
use std::path::{Path, PathBuf};
use triage_shared::UploadedFile;

const FALLBACK_MIME: &str = "application/octet-stream";

/// A file on disk plus the metadata used to validate it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    pub path: PathBuf,
    pub meta: UploadedFile,
}

impl AttachedFile {
    /// Stat `path` and derive its MIME type from the extension
    pub fn inspect(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path: path.to_path_buf(),
            meta: UploadedFile::new(name, mime_for_path(path), metadata.len()),
        })
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    /// File contents as text; invalid UTF-8 is replaced, not rejected
    pub async fn read_text(&self) -> io::Result<String> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// MIME type for a path, by extension
pub fn mime_for_path(path: &Path) -> String {
    // Log files are plain text but have no registered MIME type
    let is_log = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("log"))
        .unwrap_or(false);
    if is_log {
        return "text/plain".to_string();
    }

    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MIME)
        .to_string()
}
