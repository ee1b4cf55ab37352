//! Document identity and kind.

use std::fmt;

/// Extensions treated as inlineable images.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "bmp"];

/// What a document is, derived from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// A markdown note (`.md`).
    Markdown,
    /// An image that can be inlined as a data URI.
    Image,
    /// Anything else (PDFs, audio, canvases, ...).
    Other,
}

/// A document in the vault, identified by its vault-relative path.
///
/// Paths always use `/` as the separator regardless of platform, so the
/// same vault produces the same identities everywhere.
///
/// # Examples
///
/// ```
/// use vellum::domain::{Document, DocumentKind};
///
/// let doc = Document::new("attachments/Diagram.PNG");
/// assert_eq!(doc.file_name(), "Diagram.PNG");
/// assert_eq!(doc.basename(), "Diagram");
/// assert_eq!(doc.extension().as_deref(), Some("png"));
/// assert_eq!(doc.kind(), DocumentKind::Image);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Document {
    path: String,
}

impl Document {
    /// Creates a document from a vault-relative path.
    ///
    /// Backslashes are normalized to `/` and a leading `./` or `/` is dropped.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into().replace('\\', "/");
        let path = path
            .strip_prefix("./")
            .or_else(|| path.strip_prefix('/'))
            .map(str::to_string)
            .unwrap_or(path);
        Self { path }
    }

    /// Returns the vault-relative path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the final path segment, extension included.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Returns the file name without its extension.
    pub fn basename(&self) -> &str {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
    }

    /// Returns the lowercase extension, if any.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
                Some(ext.to_ascii_lowercase())
            }
            _ => None,
        }
    }

    /// Classifies the document by extension.
    pub fn kind(&self) -> DocumentKind {
        match self.extension().as_deref() {
            Some("md") => DocumentKind::Markdown,
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => DocumentKind::Image,
            _ => DocumentKind::Other,
        }
    }

    /// Returns true for markdown notes.
    pub fn is_markdown(&self) -> bool {
        self.kind() == DocumentKind::Markdown
    }

    /// MIME type for an image document.
    ///
    /// Returns `None` for documents that are not images.
    pub fn image_mime(&self) -> Option<String> {
        if self.kind() != DocumentKind::Image {
            return None;
        }
        let ext = self.extension()?;
        Some(match ext.as_str() {
            "svg" => "image/svg+xml".to_string(),
            "jpg" => "image/jpeg".to_string(),
            other => format!("image/{}", other),
        })
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Document(\"{}\")", self.path)
    }
}

impl From<&str> for Document {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}
