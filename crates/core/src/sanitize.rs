//! HTML allow-list sanitizer for article bodies.
//!
//! Article content arrives as rich text from the editor widget and is
//! rendered as HTML by readers, so every body passes through
//! [`sanitize_content`] before it is persisted. Tags outside
//! [`ALLOWED_TAGS`] are unwrapped (their text survives), attributes outside
//! the per-tag allow-list are dropped, and the tags in
//! [`DISCARDED_CONTENT_TAGS`] are removed together with everything inside
//! them.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use ammonia::{Builder, UrlRelative};
use regex::Regex;

/// Block and inline tags kept in article bodies.
pub const ALLOWED_TAGS: &[&str] = &[
    // Sectioning and headings
    "address", "article", "aside", "footer", "header", "h1", "h2", "h3", "h4", "h5", "h6",
    "hgroup", "main", "nav", "section",
    // Text blocks
    "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure", "hr", "li", "ol", "p",
    "pre", "ul",
    // Inline text
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em", "i", "kbd",
    "mark", "q", "rb", "rp", "rt", "rtc", "ruby", "s", "samp", "small", "span", "strong",
    "sub", "sup", "time", "u", "var", "wbr",
    // Tables
    "caption", "col", "colgroup", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
    // Media
    "img",
];

/// Tags removed along with their entire body.
pub const DISCARDED_CONTENT_TAGS: &[&str] = &["script", "style", "textarea", "option", "noscript"];

/// URL schemes accepted in `href` and `src`. Relative URLs pass through.
pub const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "ftp", "mailto", "tel"];

const LINK_ATTRIBUTES: &[&str] = &["href", "name", "target"];

const IMAGE_ATTRIBUTES: &[&str] = &["src", "alt", "title", "width", "height"];

/// Entities the HTML serializer emits for text nodes and attribute values.
static SERIALIZED_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(amp|lt|gt|quot|nbsp);").expect("valid regex"));

/// Sanitize an article body against the allow-list.
pub fn sanitize_content(html: &str) -> String {
    let tag_attributes: HashMap<&str, HashSet<&str>> = HashMap::from([
        ("a", LINK_ATTRIBUTES.iter().copied().collect()),
        ("img", IMAGE_ATTRIBUTES.iter().copied().collect()),
    ]);

    Builder::empty()
        .tags(ALLOWED_TAGS.iter().copied().collect())
        .clean_content_tags(DISCARDED_CONTENT_TAGS.iter().copied().collect())
        .tag_attributes(tag_attributes)
        .url_schemes(ALLOWED_URL_SCHEMES.iter().copied().collect())
        .url_relative(UrlRelative::PassThrough)
        .link_rel(None)
        .clean(html)
        .to_string()
}

/// Strip every tag, decode entities, and return the trimmed text that remains.
///
/// Used for length rules, not for rendering. `&amp;` counts as one
/// character and a body made only of `&nbsp;` is empty.
pub fn plain_text(html: &str) -> String {
    let stripped = Builder::empty()
        .clean_content_tags(DISCARDED_CONTENT_TAGS.iter().copied().collect())
        .clean(html)
        .to_string();

    let decoded = SERIALIZED_ENTITY_RE.replace_all(&stripped, |caps: &regex::Captures<'_>| {
        match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            _ => "\u{a0}",
        }
    });

    // `str::trim` covers Unicode whitespace, U+00A0 included.
    decoded.trim().to_string()
}
