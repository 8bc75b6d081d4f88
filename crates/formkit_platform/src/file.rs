//! File metadata delivered by drops and pickers

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PlatformError, Result};

/// Content type used when the extension gives no hint
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// A file as reported by a drop payload or a picker result
///
/// Platforms do not always know everything about a file: sandboxed pickers
/// may withhold the size and unreadable entries carry only a name. Widgets
/// decide what to do with incomplete metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DroppedFile {
    /// File name (no directory components)
    pub name: String,
    /// Size in bytes, if it could be determined
    pub byte_size: Option<u64>,
    /// Content type, if known
    pub mime_type: Option<String>,
    /// Location on disk, if the file came from the local filesystem
    pub path: Option<PathBuf>,
}

impl DroppedFile {
    /// Create a file with full metadata and no backing path
    pub fn new(name: impl Into<String>, byte_size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            byte_size: Some(byte_size),
            mime_type: Some(mime_type.into()),
            path: None,
        }
    }

    /// A file whose metadata could not be read
    pub fn unreadable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            byte_size: None,
            mime_type: None,
            path: None,
        }
    }

    /// Read size and guess the content type of a file on disk
    pub fn inspect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|source| PlatformError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(PlatformError::NotAFile(path.to_path_buf()));
        }

        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or(FALLBACK_MIME_TYPE)
            .to_string();

        Ok(Self {
            name: display_name(path),
            byte_size: Some(metadata.len()),
            mime_type: Some(mime_type),
            path: Some(path.to_path_buf()),
        })
    }

    /// Like [`inspect`](Self::inspect), but degrades to an unreadable entry
    pub fn inspect_or_unreadable(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::inspect(path) {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!(error = %err, "could not inspect dropped file");
                let mut file = Self::unreadable(display_name(path));
                file.path = Some(path.to_path_buf());
                file
            }
        }
    }

    /// Whether enough metadata is known to validate the file
    pub fn is_readable(&self) -> bool {
        self.byte_size.is_some()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("attachment.bin")
        .to_string()
}
