use std::sync::LazyLock;

use regex::Regex;

/// Matches client markup such as `<col=ff0000>`, `</col>` and `<img=12>`.
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid markup tag regex"));

const NBSP: char = '\u{00A0}';

/// Strip display-formatting tags injected by the client or third-party overlays.
pub fn remove_tags(text: &str) -> String {
    TAG_PATTERN.replace_all(text, "").into_owned()
}

/// Canonical player identity as the game server sees it.
///
/// Non-breaking spaces become spaces, anything outside ASCII is dropped,
/// `_` and `-` are treated as spaces and the result is trimmed.
pub fn to_jagex_name(name: &str) -> String {
    let mapped: String = name
        .chars()
        .filter_map(|c| match c {
            NBSP | '_' | '-' => Some(' '),
            c if c.is_ascii() => Some(c),
            _ => None,
        })
        .collect();
    mapped.trim().to_string()
}

/// Identity key used for recency tracking and roster lookups.
pub fn normalize_identity(raw: &str) -> String {
    to_jagex_name(&remove_tags(raw))
}
