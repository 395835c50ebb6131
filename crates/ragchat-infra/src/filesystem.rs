//! Filesystem helpers: the data directory and reading documents for upload.

use std::io;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "RAGCHAT_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `RAGCHAT_DATA_DIR` environment variable
/// 2. `~/.ragchat`
/// 3. `./.ragchat`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV)
        && !dir.trim().is_empty()
    {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".ragchat");
    }

    PathBuf::from(".ragchat")
}

/// A document read from disk, ready to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Read `path` into memory. The upload is named after the path's final
/// component.
pub async fn read_upload(path: &Path) -> io::Result<UploadFile> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} does not name a file", path.display()),
            )
        })?;

    let metadata = tokio::fs::metadata(path).await?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a regular file", path.display()),
        ));
    }

    let bytes = tokio::fs::read(path).await?;
    tracing::debug!(path = %path.display(), size = bytes.len(), "Read upload");
    Ok(UploadFile { filename, bytes })
}
