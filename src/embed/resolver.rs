//! Recursive embed expansion.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use tracing::{debug, trace};

use super::anchor::extract;
use crate::domain::{Document, DocumentKind, EmbedReference};
use crate::infra::strip_frontmatter;
use crate::vault::{Vault, VaultError};

/// Nesting level beyond which embeds are left unexpanded.
pub const MAX_EMBED_DEPTH: usize = 10;

/// Errors while resolving embeds.
///
/// Unresolvable references are not errors; they stay in the text as written.
/// Only failing to read a document that *was* resolved aborts resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to read embedded document: {0}")]
    Vault(#[from] VaultError),
}

/// Expands `![[...]]` embeds into inline content.
///
/// Notes are inlined as text (recursively, depth-first), images become
/// base64 data URIs, and anything else is left as written. Each call walks
/// its own `(text, source, depth)`; the resolver holds no traversal state.
///
/// # Examples
///
/// ```
/// use vellum::domain::Document;
/// use vellum::embed::EmbedResolver;
/// use vellum::vault::MemoryVault;
///
/// let vault = MemoryVault::new()
///     .with_note("main.md", "Start\n![[part]]\nEnd")
///     .with_note("part.md", "---\ntags: [x]\n---\nMiddle")
///     .with_links("main.md", ["part.md"]);
///
/// let resolver = EmbedResolver::new(&vault);
/// let out = resolver
///     .resolve("Start\n![[part]]\nEnd", &Document::new("main.md"))
///     .unwrap();
/// assert_eq!(out, "Start\nMiddle\nEnd");
/// ```
pub struct EmbedResolver<'a, V: ?Sized> {
    vault: &'a V,
}

impl<'a, V: Vault + ?Sized> EmbedResolver<'a, V> {
    /// Creates a resolver reading from `vault`.
    pub fn new(vault: &'a V) -> Self {
        Self { vault }
    }

    /// Resolves every embed in `content`, which belongs to `source`.
    pub fn resolve(&self, content: &str, source: &Document) -> Result<String, ResolveError> {
        self.resolve_at(content, source, 0)
    }

    fn resolve_at(
        &self,
        content: &str,
        source: &Document,
        depth: usize,
    ) -> Result<String, ResolveError> {
        if depth > MAX_EMBED_DEPTH {
            debug!(source = %source, depth, "embed depth limit reached");
            return Ok(content.to_string());
        }

        let mut lines: Vec<String> = Vec::new();
        for line in content.split('\n') {
            if let Some(replacement) = self.resolve_line(line, source, depth)? {
                lines.push(replacement);
            }
        }
        Ok(lines.join("\n"))
    }

    /// Returns the replacement for one line, or `None` to drop it.
    fn resolve_line(
        &self,
        line: &str,
        source: &Document,
        depth: usize,
    ) -> Result<Option<String>, ResolveError> {
        let Some(embed) = EmbedReference::find(line) else {
            return Ok(Some(line.to_string()));
        };

        let Some(target) = self.find_target(source, &embed.target) else {
            debug!(source = %source, target = %embed.target, "unresolved embed");
            return Ok(Some(line.to_string()));
        };

        if target == *source {
            trace!(source = %source, "dropping self-embed");
            return Ok(None);
        }

        match target.kind() {
            DocumentKind::Image => {
                let bytes = self.vault.read_binary(&target)?;
                Ok(Some(image_markdown(&target, &bytes)))
            }
            DocumentKind::Markdown => {
                let text = self.vault.read_text(&target)?;
                let body = strip_frontmatter(&text);
                let selected = match &embed.anchor {
                    Some(anchor) => extract(body, anchor),
                    None => body,
                };
                trace!(source = %source, target = %target, depth, "inlining note");
                self.resolve_at(selected, &target, depth + 1).map(Some)
            }
            DocumentKind::Other => Ok(Some(line.to_string())),
        }
    }

    /// First link-graph candidate matching `name`.
    fn find_target(&self, source: &Document, name: &str) -> Option<Document> {
        self.vault
            .links_from(source.path())
            .into_iter()
            .find(|candidate| target_matches(candidate, name))
            .map(Document::new)
    }
}

/// Whether a candidate path satisfies an embed target name.
///
/// Matches on the file name, the file stem, or a path suffix on a `/`
/// boundary, with or without the candidate's extension.
fn target_matches(candidate: &str, name: &str) -> bool {
    let document = Document::new(candidate);
    let name = name.trim_start_matches("./").trim_start_matches('/');
    if document.file_name() == name || document.basename() == name {
        return true;
    }

    let path = document.path();
    let without_ext = match document.extension() {
        Some(ext) => &path[..path.len() - ext.len() - 1],
        None => path,
    };
    [path, without_ext]
        .iter()
        .any(|p| *p == name || p.ends_with(&format!("/{}", name)))
}

/// Markdown image with the bytes inlined as a data URI.
fn image_markdown(document: &Document, bytes: &[u8]) -> String {
    let mime = document
        .image_mime()
        .unwrap_or_else(|| "application/octet-stream".to_string());
    format!(
        "![{}](data:{};base64,{})",
        document.basename(),
        mime,
        STANDARD.encode(bytes)
    )
}
