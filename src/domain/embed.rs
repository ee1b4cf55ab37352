//! Embed markers of the form `![[target#anchor|modifier]]`.

use std::sync::LazyLock;

use regex::Regex;

/// Matches the first embed marker on a line.
static EMBED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[([^\[\]]+)\]\]").expect("embed pattern is valid"));

/// Which part of the target document an embed selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// Heading text, e.g. `![[note#Section]]`.
    Heading(String),
    /// A block identifier including its caret, e.g. `![[note#^abc123]]`.
    Block(String),
}

impl Anchor {
    /// Classifies a raw anchor string. Returns `None` for empty input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else if raw.starts_with('^') {
            Some(Anchor::Block(raw.to_string()))
        } else {
            Some(Anchor::Heading(raw.to_string()))
        }
    }

    /// Returns the anchor text as written.
    pub fn as_str(&self) -> &str {
        match self {
            Anchor::Heading(s) | Anchor::Block(s) => s,
        }
    }
}

/// A parsed embed marker.
///
/// # Examples
///
/// ```
/// use vellum::domain::{Anchor, EmbedReference};
///
/// let embed = EmbedReference::find("See ![[Recipes#^step2|alias]]").unwrap();
/// assert_eq!(embed.target, "Recipes");
/// assert_eq!(embed.anchor, Some(Anchor::Block("^step2".into())));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReference {
    /// Link target as written, without anchor or modifier.
    pub target: String,
    /// Optional sub-document selector.
    pub anchor: Option<Anchor>,
}

impl EmbedReference {
    /// Finds and parses the first embed marker on `line`.
    ///
    /// Returns `None` when the line has no marker or its target is blank.
    pub fn find(line: &str) -> Option<Self> {
        let caps = EMBED_RE.captures(line)?;
        Self::parse(&caps[1])
    }

    /// Parses the inside of a marker (`target#anchor|modifier`).
    pub fn parse(inner: &str) -> Option<Self> {
        // `|300` sizes and `|alias` labels don't affect resolution
        let link = inner.split('|').next().unwrap_or(inner);
        let (target, anchor) = match link.split_once('#') {
            Some((target, anchor)) => (target, Anchor::parse(anchor)),
            None => (link, None),
        };
        let target = target.trim();
        if target.is_empty() {
            return None;
        }
        Some(Self {
            target: target.to_string(),
            anchor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_plain_target() {
        let embed = EmbedReference::find("![[img.png]]").unwrap();
        assert_eq!(embed.target, "img.png");
        assert_eq!(embed.anchor, None);
    }

    #[test]
    fn finds_marker_inside_text() {
        let embed = EmbedReference::find("before ![[note]] after").unwrap();
        assert_eq!(embed.target, "note");
    }

    #[test]
    fn heading_anchor() {
        let embed = EmbedReference::find("![[note#Part One]]").unwrap();
        assert_eq!(embed.anchor, Some(Anchor::Heading("Part One".into())));
    }

    #[test]
    fn nested_heading_anchor_keeps_full_path() {
        let embed = EmbedReference::find("![[note#Top#Inner]]").unwrap();
        assert_eq!(embed.anchor, Some(Anchor::Heading("Top#Inner".into())));
    }

    #[test]
    fn block_anchor() {
        let embed = EmbedReference::find("![[note#^block1]]").unwrap();
        assert_eq!(embed.anchor, Some(Anchor::Block("^block1".into())));
    }

    #[test]
    fn modifier_is_ignored() {
        let embed = EmbedReference::find("![[photo.jpg|300]]").unwrap();
        assert_eq!(embed.target, "photo.jpg");
        assert_eq!(embed.anchor, None);
    }

    #[test]
    fn empty_anchor_is_none() {
        let embed = EmbedReference::find("![[note#]]").unwrap();
        assert_eq!(embed.anchor, None);
    }

    #[test]
    fn plain_wikilink_is_not_an_embed() {
        assert_eq!(EmbedReference::find("[[note]]"), None);
    }

    #[test]
    fn blank_target_is_rejected() {
        assert_eq!(EmbedReference::find("![[ #Heading]]"), None);
        assert_eq!(EmbedReference::find("![[]]"), None);
    }
}
