//! An in-memory vault for tests and embedding.

use std::collections::HashMap;

use super::{DocumentStore, LinkGraph, VaultError};
use crate::domain::Document;

/// A vault held entirely in memory.
///
/// Links are explicit: a source only sees the targets registered for it
/// with [`with_links`](Self::with_links), in registration order.
///
/// # Examples
///
/// ```
/// use vellum::vault::{DocumentStore, LinkGraph, MemoryVault};
///
/// let vault = MemoryVault::new()
///     .with_note("a.md", "![[b]]")
///     .with_note("b.md", "Hello")
///     .with_links("a.md", ["b.md"]);
///
/// assert_eq!(vault.links_from("a.md"), vec!["b.md"]);
/// let b = vault.resolve_path("b.md").unwrap();
/// assert_eq!(vault.read_text(&b).unwrap(), "Hello");
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryVault {
    files: HashMap<String, Vec<u8>>,
    links: HashMap<String, Vec<String>>,
}

impl MemoryVault {
    /// Creates an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text document.
    pub fn with_note(self, path: &str, text: &str) -> Self {
        self.with_file(path, text.as_bytes().to_vec())
    }

    /// Adds a document with arbitrary bytes.
    pub fn with_file(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        let document = Document::new(path);
        self.files.insert(document.path().to_string(), bytes.into());
        self
    }

    /// Appends link targets for `source`.
    pub fn with_links<I, S>(mut self, source: &str, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.links
            .entry(Document::new(source).path().to_string())
            .or_default()
            .extend(
                targets
                    .into_iter()
                    .map(|t| Document::new(t.as_ref()).path().to_string()),
            );
        self
    }
}

impl LinkGraph for MemoryVault {
    fn links_from(&self, source: &str) -> Vec<String> {
        self.links
            .get(Document::new(source).path())
            .cloned()
            .unwrap_or_default()
    }
}

impl DocumentStore for MemoryVault {
    fn resolve_path(&self, path: &str) -> Option<Document> {
        let document = Document::new(path);
        self.files
            .contains_key(document.path())
            .then_some(document)
    }

    fn read_text(&self, document: &Document) -> Result<String, VaultError> {
        let bytes = self.read_binary(document)?;
        String::from_utf8(bytes).map_err(|e| VaultError::InvalidEncoding {
            path: document.path().to_string(),
            reason: format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
        })
    }

    fn read_binary(&self, document: &Document) -> Result<Vec<u8>, VaultError> {
        self.files
            .get(document.path())
            .cloned()
            .ok_or_else(|| VaultError::NotFound {
                path: document.path().to_string(),
            })
    }
}
