//! Attachment file names derived from note titles.

/// Characters that are unsafe in file names on common filesystems and
/// mail clients.
const FORBIDDEN: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Converts a note title to a PDF attachment file name.
///
/// Unlike a URL slug the title's case and spacing are kept, since Kindle
/// shows the file name as the document title in its library.
///
/// - Replaces path separators, reserved punctuation and control characters
///   with spaces
/// - Collapses runs of whitespace and trims the ends
/// - Truncates to 80 characters
/// - Falls back to "untitled" for empty results
///
/// # Examples
///
/// ```
/// use vellum::infra::attachment_name;
///
/// assert_eq!(attachment_name("Reading List"), "Reading List.pdf");
/// assert_eq!(attachment_name("Q&A: What/Why?"), "Q&A What Why.pdf");
/// assert_eq!(attachment_name("  "), "untitled.pdf");
/// ```
pub fn attachment_name(title: &str) -> String {
    const MAX_LENGTH: usize = 80;

    let cleaned: String = title
        .chars()
        .map(|c| {
            if FORBIDDEN.contains(&c) || c.is_control() {
                ' '
            } else {
                c
            }
        })
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(MAX_LENGTH).collect();
    let stem = truncated.trim_end().trim_end_matches('.');

    if stem.is_empty() {
        return "untitled.pdf".to_string();
    }
    format!("{}.pdf", stem)
}
