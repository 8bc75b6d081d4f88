//! Field values stored in form slots

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{FormError, Result};

/// Opaque handle to the bytes behind a [`FileEntry`]
///
/// Widgets never read through the handle; it travels with the entry so the
/// surrounding application can upload or preview the file later.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum ContentHandle {
    /// No content attached (metadata only)
    #[default]
    Detached,
    /// Content lives on disk
    Path(PathBuf),
    /// Content already loaded in memory
    Bytes(Arc<[u8]>),
}

impl fmt::Debug for ContentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentHandle::Detached => f.write_str("Detached"),
            ContentHandle::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ContentHandle::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

/// Deduplication key for attachments: two files with the same name and byte
/// size are the same attachment, regardless of content
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdentityKey<'a> {
    pub name: &'a str,
    pub byte_size: u64,
}

/// A candidate or accepted file attachment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name as reported by the acquisition source
    pub name: String,
    /// Size in bytes
    pub byte_size: u64,
    /// Content type, e.g. `image/png`
    pub mime_type: String,
    /// Handle to the file content
    #[serde(skip)]
    pub content: ContentHandle,
}

impl FileEntry {
    /// Create a metadata-only entry
    pub fn new(name: impl Into<String>, byte_size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            byte_size,
            mime_type: mime_type.into(),
            content: ContentHandle::Detached,
        }
    }

    /// Attach a content handle
    pub fn with_content(mut self, content: ContentHandle) -> Self {
        self.content = content;
        self
    }

    /// The `(name, byte_size)` pair used to detect duplicate submissions
    pub fn identity_key(&self) -> IdentityKey<'_> {
        IdentityKey {
            name: &self.name,
            byte_size: self.byte_size,
        }
    }
}

/// Value held in a form slot
///
/// Serializes as `null`, a string, or an array of file entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Nothing set
    #[default]
    Null,
    /// A text or choice value
    Text(String),
    /// An ordered list of file attachments
    Files(Vec<FileEntry>),
}

impl FieldValue {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Whether the value counts as "not filled in"
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Files(files) => files.is_empty(),
        }
    }

    /// Short name of the value kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Text(_) => "text",
            FieldValue::Files(_) => "files",
        }
    }

    /// Borrow the text, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Borrow the files, if this is a file list
    pub fn as_files(&self) -> Option<&[FileEntry]> {
        match self {
            FieldValue::Files(files) => Some(files),
            _ => None,
        }
    }

    /// Number of attached files (0 for non-file values)
    pub fn file_count(&self) -> usize {
        self.as_files().map_or(0, <[FileEntry]>::len)
    }

    /// Interpret the value as an optional choice for `field`
    ///
    /// `Null` and the empty string both mean "nothing selected".
    pub fn into_choice(self, field: &str) -> Result<Option<String>> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::Text(text) if text.is_empty() => Ok(None),
            FieldValue::Text(text) => Ok(Some(text)),
            other => Err(FormError::TypeMismatch {
                field: field.to_string(),
                expected: "text",
                found: other.kind(),
            }),
        }
    }

    /// Interpret the value as a file list for `field`
    ///
    /// `Null` means "no files yet".
    pub fn into_files(self, field: &str) -> Result<Vec<FileEntry>> {
        match self {
            FieldValue::Null => Ok(Vec::new()),
            FieldValue::Files(files) => Ok(files),
            other => Err(FormError::TypeMismatch {
                field: field.to_string(),
                expected: "files",
                found: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_key_ignores_content() {
        let a = FileEntry::new("report.pdf", 1200, "application/pdf");
        let b = FileEntry::new("report.pdf", 1200, "application/octet-stream")
            .with_content(ContentHandle::Bytes(Arc::from(vec![1u8, 2, 3])));

        assert_eq!(a.identity_key(), b.identity_key());
        assert_ne!(
            a.identity_key(),
            FileEntry::new("report.pdf", 1201, "application/pdf").identity_key()
        );
    }

    #[test]
    fn test_field_value_emptiness() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::text("").is_empty());
        assert!(FieldValue::Files(Vec::new()).is_empty());
        assert!(!FieldValue::text("x").is_empty());
    }

    #[test]
    fn test_into_choice() {
        assert_eq!(FieldValue::Null.into_choice("f"), Ok(None));
        assert_eq!(FieldValue::text("").into_choice("f"), Ok(None));
        assert_eq!(
            FieldValue::text("us").into_choice("f"),
            Ok(Some("us".to_string()))
        );

        let err = FieldValue::Files(Vec::new()).into_choice("country").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field `country` holds a files value, expected text"
        );
    }

    #[test]
    fn test_into_files() {
        assert_eq!(FieldValue::Null.into_files("f"), Ok(Vec::new()));
        assert!(FieldValue::text("nope").into_files("f").is_err());
    }

    #[test]
    fn test_serializes_without_content() {
        let value = FieldValue::Files(vec![FileEntry::new("a.png", 10, "image/png")
            .with_content(ContentHandle::Path(PathBuf::from("/tmp/a.png")))]);
        let json = serde_json::to_value(&value).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{ "name": "a.png", "byte_size": 10, "mime_type": "image/png" }])
        );
        assert_eq!(serde_json::to_value(FieldValue::Null).unwrap(), serde_json::Value::Null);
        assert_eq!(
            serde_json::to_value(FieldValue::text("de")).unwrap(),
            serde_json::json!("de")
        );
    }

    #[test]
    fn test_content_handle_debug_hides_bytes() {
        let handle = ContentHandle::Bytes(Arc::from(vec![0u8; 64]));
        assert_eq!(format!("{:?}", handle), "Bytes(64 bytes)");
    }
}
