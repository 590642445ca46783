use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
// <a href=URL>text</a>, URL quoted with ' or " (optionally backslash-escaped) or bare.
static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<a\s+[^>]*?href\s*=\s*(?:\\?["'])?\s*([^"'\\>\s]*)\s*(?:\\?["'])?[^>]*>(.*?)</a\s*>"#,
    )
    .unwrap()
});
static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// The five entities the source pages escape. Anything else stays literal.
const ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

/// Drop everything between angle brackets and trim. A literal `<` or `>` in
/// text is lost along with the tags.
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").trim().to_string()
}

pub fn decode_entities(text: &str) -> String {
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// First anchor with a closing tag: `(href, inner text)`, both untrimmed.
pub fn find_anchor(text: &str) -> Option<(&str, &str)> {
    let caps = ANCHOR_RE.captures(text)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// `href` of the first `<a>` element, parsed as HTML, so entities in the
/// attribute are decoded and an unclosed anchor still counts.
pub fn anchor_href(text: &str) -> Option<String> {
    let fragment = Html::parse_fragment(text);
    let anchor = fragment.select(&ANCHOR_SEL).next()?;
    anchor.value().attr("href").map(str::to_string)
}

/// Markup to display text: the fragment is parsed as HTML and its text nodes
/// joined, with every named and numeric entity decoded. Trimmed.
pub fn to_plain_text(text: &str) -> String {
    let fragment = Html::parse_fragment(text);
    let joined: String = fragment.root_element().text().collect();
    joined.trim().to_string()
}
