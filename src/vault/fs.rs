//! A vault backed by a directory on disk.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex};

use regex::Regex;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::{DocumentStore, LinkGraph, VaultError};
use crate::domain::Document;

/// Matches wikilinks and embeds: `[[target]]`, `![[target#anchor|alias]]`.
static WIKILINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[\[([^\[\]]+)\]\]").expect("wikilink pattern is valid"));

/// A vault rooted at a directory.
///
/// The file listing is taken once when the vault is opened. Hidden files
/// and directories (`.obsidian`, `.git`, `.trash`, ...) are skipped.
/// Outgoing links are scanned once per source and then reused.
#[derive(Debug)]
pub struct FsVault {
    root: PathBuf,
    files: BTreeSet<String>,
    links: Mutex<HashMap<String, Vec<String>>>,
}

impl FsVault {
    /// Opens the vault at `root` and lists its files.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::RootNotFound` if `root` is not a directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, VaultError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(VaultError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

        let files: BTreeSet<String> = WalkDir::new(&root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.path().strip_prefix(&root).ok().map(to_vault_path))
            .collect();

        debug!(root = %root.display(), files = files.len(), "opened vault");
        Ok(Self {
            root,
            files,
            links: Mutex::new(HashMap::new()),
        })
    }

    /// Returns the vault root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Iterates over all vault-relative file paths in sorted order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    /// Resolves a user-supplied note reference.
    ///
    /// Accepts, in order of preference:
    /// - an exact vault-relative path (`notes/Idea.md`)
    /// - a filesystem path to a file inside the vault
    /// - a link-style name (`Idea`, `notes/Idea`)
    pub fn find(&self, query: &str) -> Option<Document> {
        if let Some(doc) = self.resolve_path(query) {
            return Some(doc);
        }

        let fs_path = Path::new(query);
        if fs_path.is_file()
            && let Ok(absolute) = fs_path.canonicalize()
            && let Ok(relative) = absolute.strip_prefix(&self.root)
            && let Some(doc) = self.resolve_path(&to_vault_path(relative))
        {
            return Some(doc);
        }

        self.resolve_link(query).map(Document::new)
    }

    /// Resolves a wikilink target to a vault path.
    ///
    /// An exact path match wins (`.md` may be omitted). Otherwise any file
    /// whose path ends with the target, or a markdown file whose stem equals
    /// it, is a candidate; the shortest path wins, then lexicographic order.
    pub fn resolve_link(&self, target: &str) -> Option<&str> {
        let target = target.trim().trim_start_matches("./").trim_start_matches('/');
        if target.is_empty() {
            return None;
        }

        let with_md = format!("{}.md", target);
        if let Some(path) = self.files.get(target).or_else(|| self.files.get(&with_md)) {
            return Some(path);
        }

        self.files
            .iter()
            .filter(|path| link_matches(path, target))
            .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            .map(String::as_str)
    }

    fn absolute(&self, document: &Document) -> PathBuf {
        self.root.join(document.path())
    }
}

impl LinkGraph for FsVault {
    /// Resolves every wikilink and embed in `source` to a vault path.
    ///
    /// Paths come back in order of first appearance with duplicates removed.
    /// Links that resolve to nothing are left out. The first successful scan
    /// of a source is cached for the life of the vault.
    fn links_from(&self, source: &str) -> Vec<String> {
        let Some(document) = self.resolve_path(source) else {
            return Vec::new();
        };
        let mut cache = self.links.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(links) = cache.get(document.path()) {
            return links.clone();
        }

        let text = match self.read_text(&document) {
            Ok(text) => text,
            Err(e) => {
                warn!(source, error = %e, "could not read links");
                return Vec::new();
            }
        };

        let mut links: Vec<String> = Vec::new();
        for caps in WIKILINK_RE.captures_iter(&text) {
            let inner = &caps[1];
            let link = inner.split('|').next().unwrap_or(inner);
            let target = link.split('#').next().unwrap_or(link);
            if let Some(path) = self.resolve_link(target)
                && !links.iter().any(|l| l == path)
            {
                links.push(path.to_string());
            }
        }
        cache.insert(document.path().to_string(), links.clone());
        links
    }
}

impl DocumentStore for FsVault {
    fn resolve_path(&self, path: &str) -> Option<Document> {
        let document = Document::new(path);
        self.files
            .contains(document.path())
            .then_some(document)
    }

    fn read_text(&self, document: &Document) -> Result<String, VaultError> {
        let bytes = self.read_binary(document)?;

        if bytes.starts_with(&[0xFF, 0xFE]) || bytes.starts_with(&[0xFE, 0xFF]) {
            return Err(VaultError::InvalidEncoding {
                path: document.path().to_string(),
                reason: "UTF-16 byte order mark detected; convert to UTF-8".into(),
            });
        }

        let text = String::from_utf8(bytes).map_err(|e| VaultError::InvalidEncoding {
            path: document.path().to_string(),
            reason: format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
        })?;

        match text.strip_prefix('\u{FEFF}') {
            Some(stripped) => Ok(stripped.to_string()),
            None => Ok(text),
        }
    }

    fn read_binary(&self, document: &Document) -> Result<Vec<u8>, VaultError> {
        let path = self.absolute(document);
        std::fs::read(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => VaultError::NotFound {
                path: document.path().to_string(),
            },
            _ => VaultError::Io {
                path: document.path().to_string(),
                source,
            },
        })
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

/// Joins path components with `/`.
fn to_vault_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn link_matches(path: &str, target: &str) -> bool {
    let document = Document::new(path);
    if document.file_name() == target || path.ends_with(&format!("/{}", target)) {
        return true;
    }
    document.is_markdown()
        && (document.basename() == target || path.ends_with(&format!("/{}.md", target)))
}
