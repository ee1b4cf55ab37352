//! Vault access: the link graph and document store collaborators.
//!
//! The embed resolver never touches the filesystem directly. It asks a
//! [`LinkGraph`] which documents a source can embed and reads content
//! through a [`DocumentStore`]. [`FsVault`] implements both over a directory;
//! [`MemoryVault`] implements both in memory.

mod fs;
mod memory;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Document;

pub use fs::FsVault;
pub use memory::MemoryVault;

/// Errors while reading from a vault.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("vault directory not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("document not found: {path}")]
    NotFound { path: String },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid encoding in {path}: {reason}")]
    InvalidEncoding { path: String, reason: String },
}

/// Answers "which documents can this source embed?"
pub trait LinkGraph {
    /// Returns candidate target paths for `source`, in a stable order.
    ///
    /// The resolver takes the first candidate that matches an embed target,
    /// so implementations decide tie-breaks through this order.
    fn links_from(&self, source: &str) -> Vec<String>;
}

/// Reads documents by logical path.
pub trait DocumentStore {
    /// Looks up a document by its exact vault-relative path.
    fn resolve_path(&self, path: &str) -> Option<Document>;

    /// Reads a document as UTF-8 text.
    fn read_text(&self, document: &Document) -> Result<String, VaultError>;

    /// Reads a document's raw bytes.
    fn read_binary(&self, document: &Document) -> Result<Vec<u8>, VaultError>;
}

/// A vault that provides both collaborators.
pub trait Vault: LinkGraph + DocumentStore {}

impl<T: LinkGraph + DocumentStore> Vault for T {}

impl<T: LinkGraph + ?Sized> LinkGraph for &T {
    fn links_from(&self, source: &str) -> Vec<String> {
        (**self).links_from(source)
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn resolve_path(&self, path: &str) -> Option<Document> {
        (**self).resolve_path(path)
    }

    fn read_text(&self, document: &Document) -> Result<String, VaultError> {
        (**self).read_text(document)
    }

    fn read_binary(&self, document: &Document) -> Result<Vec<u8>, VaultError> {
        (**self).read_binary(document)
    }
}
