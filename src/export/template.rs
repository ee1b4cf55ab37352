//! HTML shell wrapped around the converted note body.

use minijinja::{Environment, context};

/// Template for the exported document.
///
/// The template name ends in `.html`, so minijinja escapes `title` and
/// `author`. Body and style sheet are trusted markup.
pub const DOCUMENT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{{ title }}</title>
    {% if author %}<meta name="author" content="{{ author }}">
    {% endif %}<style>{{ stylesheet|safe }}</style>
</head>
<body>
    <h1 class="document-title">{{ title }}</h1>
{{ body|safe }}
</body>
</html>
"##;

/// Renders the complete HTML document.
pub fn render_document(
    title: &str,
    author: Option<&str>,
    stylesheet: &str,
    body: &str,
) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("document.html", DOCUMENT_TEMPLATE)?;
    let tmpl = env.get_template("document.html")?;

    tmpl.render(context! {
        title => title,
        author => author.filter(|a| !a.trim().is_empty()),
        stylesheet => stylesheet,
        body => body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_title_twice() {
        let html = render_document("Weekly Review", None, "", "<p>x</p>").unwrap();
        assert!(html.contains("<title>Weekly Review</title>"));
        assert!(html.contains("<h1 class=\"document-title\">Weekly Review</h1>"));
    }

    #[test]
    fn escapes_title() {
        let html = render_document("Tom & <Jerry>", None, "", "").unwrap();
        assert!(html.contains("Tom &amp; &lt;Jerry&gt;"));
        assert!(!html.contains("<Jerry>"));
    }

    #[test]
    fn body_and_stylesheet_are_not_escaped() {
        let html = render_document(
            "T",
            None,
            "body { font-family: 'Serif'; }",
            "<p><mark>hi</mark></p>",
        )
        .unwrap();
        assert!(html.contains("<p><mark>hi</mark></p>"));
        assert!(html.contains("font-family: 'Serif';"));
    }

    #[test]
    fn author_meta_is_optional() {
        let without = render_document("T", None, "", "").unwrap();
        assert!(!without.contains("name=\"author\""));

        let blank = render_document("T", Some("  "), "", "").unwrap();
        assert!(!blank.contains("name=\"author\""));

        let with = render_document("T", Some("Ada <ada@x>"), "", "").unwrap();
        assert!(with.contains("<meta name=\"author\" content=\"Ada &lt;ada@x&gt;\">"));
    }

    #[test]
    fn output_is_deterministic() {
        let a = render_document("T", Some("A"), "css", "<p>b</p>").unwrap();
        let b = render_document("T", Some("A"), "css", "<p>b</p>").unwrap();
        assert_eq!(a, b);
    }
}
