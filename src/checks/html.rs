//! Visible-text extraction
//!
//! The `text_in_html` rule matches against the text a visitor would see,
//! not the raw markup. This module reduces an HTML document to that text:
//! script/style payloads and comments are dropped, the remaining tags are
//! stripped, the entities that show up in ordinary prose are decoded and
//! whitespace is collapsed. Good enough for containment checks; not a DOM.

use regex::Regex;

/// Extract the human-visible text from an HTML document.
///
/// The result is a single line with runs of whitespace collapsed to one
/// space, so rules should be written single-spaced.
pub fn visible_text(html: &str) -> String {
    let comments = Regex::new(r"(?s)<!--.*?-->").expect("static pattern");
    let scripts = Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("static pattern");
    let styles = Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("static pattern");
    let tags = Regex::new(r"<[^>]+>").expect("static pattern");
    let whitespace = Regex::new(r"\s+").expect("static pattern");

    let text = comments.replace_all(html, " ");
    let text = scripts.replace_all(&text, " ");
    let text = styles.replace_all(&text, " ");
    let text = tags.replace_all(&text, " ");
    let text = decode_entities(&text);
    let text = whitespace.replace_all(&text, " ");

    text.trim().to_string()
}

/// Decode the handful of entities common in prose. `&amp;` goes last so
/// `&amp;lt;` comes out as the literal `&lt;`.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
