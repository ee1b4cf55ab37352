//! Builder for test notes.

/// Builder for a markdown note file.
///
/// The name is the vault path without `.md`. A title, when set, is written
/// as frontmatter.
#[derive(Debug, Clone)]
pub struct TestNote {
    path: String,
    title: Option<String>,
    body: String,
}

impl TestNote {
    /// Creates an empty note at `name.md`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            path: format!("{}.md", name.into()),
            title: None,
            body: String::new(),
        }
    }

    /// Sets the frontmatter title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the body content (builder method).
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Vault-relative file path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// File contents: optional frontmatter, then the body.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(title) = &self.title {
            out.push_str(&format!("---\ntitle: \"{}\"\n---\n\n", title));
        }
        out.push_str(&self.body);
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_without_title_is_body_only() {
        let note = TestNote::new("Plain").body("hello");
        assert_eq!(note.path(), "Plain.md");
        assert_eq!(note.render(), "hello\n");
    }

    #[test]
    fn test_note_title_becomes_frontmatter() {
        let note = TestNote::new("n").title("Real Title").body("b");
        assert_eq!(note.render(), "---\ntitle: \"Real Title\"\n---\n\nb\n");
    }
}
