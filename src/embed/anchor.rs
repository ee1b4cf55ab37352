//! Selecting the part of a note an anchor points at.
//!
//! Anchors are matched as plain substrings rather than through a parsed
//! heading index. This is imprecise when the anchor text also appears
//! elsewhere in the note, which is acceptable for typical vault content.

use crate::domain::Anchor;

/// Returns the part of `text` that `anchor` selects.
///
/// Falls back to the whole text when the anchor can't be found.
pub fn extract<'a>(text: &'a str, anchor: &Anchor) -> &'a str {
    match anchor {
        Anchor::Block(id) => extract_block(text, id),
        Anchor::Heading(heading) => extract_heading(text, heading),
    }
}

/// Block anchor: the text of the anchor's line up to the `^id` marker.
///
/// ```
/// use vellum::embed::extract_block;
///
/// let text = "Intro\nA quotable line ^quote\nAfter";
/// assert_eq!(extract_block(text, "^quote"), "A quotable line");
/// ```
pub fn extract_block<'a>(text: &'a str, id: &str) -> &'a str {
    if id.is_empty() {
        return text;
    }
    let Some(pos) = text.find(id) else {
        return text;
    };
    let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    text[line_start..pos].trim()
}

/// Heading anchor: from the heading text up to the next heading line.
///
/// For heading paths like `Top#Inner` only the last segment is searched.
/// The search begins at the first `#` in the text, so a mention of the
/// heading text in leading prose isn't picked up. The extract ends before the
/// next line starting with `#` after the match, so any heading level ends it.
///
/// ```
/// use vellum::embed::extract_heading;
///
/// let text = "# Title\nintro\n## Steps\n1. mix\n2. bake\n## Notes\nhot";
/// assert_eq!(extract_heading(text, "Steps"), "1. mix\n2. bake");
/// ```
pub fn extract_heading<'a>(text: &'a str, heading: &str) -> &'a str {
    let heading = heading.rsplit('#').next().unwrap_or(heading).trim();
    if heading.is_empty() {
        return text;
    }

    let search_from = text.find('#').unwrap_or(0);
    let Some(offset) = text[search_from..].find(heading) else {
        return text;
    };
    let start = search_from + offset;
    let after_anchor = start + heading.len();

    let end = text[after_anchor..]
        .find("\n#")
        .map_or(text.len(), |i| after_anchor + i);

    text[after_anchor..end].trim_start()
}
