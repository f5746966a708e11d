//! Sanitization for text crossing the relay boundary.
//!
//! Inbound user text loses its angle brackets before it can reach the
//! prompt. Outbound model text has script, style and iframe elements
//! removed together with their content, then any remaining markup tags;
//! the stripping pass repeats until the text stops changing, so removing
//! one tag can never splice the surrounding fragments into a new one.

use regex::Regex;
use std::sync::LazyLock;

/// Elements removed with their content before general tag stripping.
static BLOCK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?is)<script\b[^>]*>[\s\S]*?</script\s*>",
        r"(?is)<style\b[^>]*>[\s\S]*?</style\s*>",
        r"(?is)<iframe\b[^>]*>[\s\S]*?</iframe\s*>",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid block regex"))
    .collect()
});

/// HTML/XML tag pattern.
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z_][a-zA-Z0-9_\-]*[^>]*>").unwrap());

/// Markdown links with stray whitespace between the brackets or around
/// the URL.
static MARKDOWN_LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*?)\]\s*\(\s*([^)]*?)\s*\)").unwrap());

/// Sanitize inbound user text: drop angle brackets, trim whitespace.
///
/// Idempotent; a message that is all markup collapses to the empty
/// string and fails the non-empty check upstream.
pub fn sanitize_input(raw: &str) -> String {
    raw.replace(['<', '>'], "").trim().to_string()
}

/// Sanitize outbound model text.
///
/// 1. Remove `<script>`, `<style>` and `<iframe>` elements and their
///    content (non-greedy, case-insensitive, across lines)
/// 2. Strip any remaining markup tags
/// 3. Repeat until nothing changes
///
/// The fixpoint makes the function idempotent even for inputs where one
/// stripping pass leaves a freshly assembled tag behind.
pub fn sanitize_output(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = strip_markup_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_markup_once(text: &str) -> String {
    let mut cleaned = text.to_string();
    for pattern in BLOCK_PATTERNS.iter() {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }
    TAG_PATTERN.replace_all(&cleaned, "").into_owned()
}

/// Normalize markdown links so stray whitespace inside `[label](url)`
/// does not break rendering on the client.
pub fn normalize_markdown_links(raw: &str) -> String {
    MARKDOWN_LINK_PATTERN
        .replace_all(raw, "[$1]($2)")
        .into_owned()
}
