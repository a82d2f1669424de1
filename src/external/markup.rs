//! Helpers for the HTML/XML fragments that news feeds embed in their text fields.

use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern"));
/// Tags that separate words when rendered.
static BREAK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(?:br|p|div|li|tr|td|h[1-6])(?:\s[^>]*)?/?>").expect("break tag pattern")
});
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("url pattern"));
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("space pattern"));

/// Decodes the handful of entities feeds actually use.
pub fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
        .replace("&nbsp;", " ")
}

/// Unwraps `<![CDATA[...]]>` if present.
pub fn strip_cdata(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("<![CDATA[")
        .and_then(|t| t.strip_suffix("]]>"))
        .unwrap_or(trimmed)
}

/// Removes tags and collapses whitespace. Inline tags such as `<b>` vanish
/// without a trace; block and line-break tags become a single space.
pub fn strip_tags(text: &str) -> String {
    let separated = BREAK_TAG_RE.replace_all(text, " ");
    let without_tags = TAG_RE.replace_all(&separated, "");
    SPACE_RE.replace_all(without_tags.trim(), " ").into_owned()
}

pub fn strip_urls(text: &str) -> String {
    let without_urls = URL_RE.replace_all(text, "");
    SPACE_RE.replace_all(without_urls.trim(), " ").into_owned()
}

/// Plain text from a feed field: CDATA unwrapped, entities decoded, tags removed.
pub fn plain_text(raw: &str) -> String {
    strip_tags(&decode_entities(strip_cdata(raw)))
}

/// First `max_chars` characters (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
