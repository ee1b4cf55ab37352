//! Frontmatter detection and stripping for markdown notes.

use serde::Deserialize;

/// Fields we read from frontmatter. Everything else is ignored.
#[derive(Debug, Default, Deserialize)]
struct FrontmatterFields {
    title: Option<String>,
}

/// Splits a note into its frontmatter block and body.
///
/// # Format
/// ```text
/// ---
/// title: Note Title
/// tags: [reading]
/// ---
/// Body content here...
/// ```
///
/// The opening `---` must be the first line (a UTF-8 BOM is skipped). The
/// closing delimiter must be a line that is exactly `---`. When both are
/// present the YAML between them is returned along with the body, whose
/// leading whitespace is trimmed. Without a complete block the text is
/// returned untouched as the body.
///
/// # Examples
///
/// ```
/// use vellum::infra::split_frontmatter;
///
/// let (yaml, body) = split_frontmatter("---\ntitle: A\n---\n\nHello");
/// assert_eq!(yaml, Some("title: A\n"));
/// assert_eq!(body, "Hello");
///
/// let (yaml, body) = split_frontmatter("No frontmatter");
/// assert_eq!(yaml, None);
/// assert_eq!(body, "No frontmatter");
/// ```
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let text = content.strip_prefix('\u{FEFF}').unwrap_or(content);

    let after_opening = if text.starts_with("---\r\n") {
        5
    } else if text.starts_with("---\n") {
        4
    } else {
        return (None, content);
    };

    let yaml_and_rest = &text[after_opening..];
    let Some(closing_pos) = find_closing_delimiter(yaml_and_rest) else {
        return (None, content);
    };

    let yaml = &yaml_and_rest[..closing_pos];
    let body = yaml_and_rest[closing_pos + 3..].trim_start();
    (Some(yaml), body)
}

/// Returns the body of a note with any frontmatter removed.
pub fn strip_frontmatter(content: &str) -> &str {
    split_frontmatter(content).1
}

/// Reads a `title` string from a frontmatter block.
///
/// Malformed YAML or a non-string title yields `None`; frontmatter is never
/// a reason to fail an export.
pub fn frontmatter_title(yaml: &str) -> Option<String> {
    let fields: FrontmatterFields = serde_yaml::from_str(yaml).ok()?;
    fields
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Finds the position of the closing `---` delimiter.
///
/// The closing delimiter must:
/// - Appear at the start of a line
/// - Be exactly `---` followed by newline or EOF
fn find_closing_delimiter(content: &str) -> Option<usize> {
    let bytes = content.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if content[pos..].starts_with("---") {
            let after = pos + 3;
            if after >= bytes.len()
                || bytes[after] == b'\n'
                || (bytes[after] == b'\r' && bytes.get(after + 1) == Some(&b'\n'))
            {
                return Some(pos);
            }
        }

        match content[pos..].find('\n') {
            Some(newline_offset) => pos += newline_offset + 1,
            None => break,
        }
    }

    None
}
