//! SSML preparation for engines with partial SSML support.
//!
//! Tags are located with a plain `<[^>]*>` scan, not an XML parser. Rewrites
//! are literal substring replacements applied to the tag text.

use regex::Regex;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Prosody keyword rewrites, applied in this order.
///
/// `x-slow` precedes `slow` so it is rewritten whole. `high` precedes `x-high`,
/// which therefore ends up as `x-1.3`; mimic has always received that.
const TAG_REWRITES: &[(&str, &str)] = &[
    ("x-slow", "0.4"),
    ("slow", "0.7"),
    ("medium", "1.0"),
    ("high", "1.3"),
    ("x-high", "1.6"),
    ("speed", "rate"),
];

/// Replace prosody rate keywords with the numeric multipliers mimic accepts.
pub fn modify_tag(tag: &str) -> String {
    TAG_REWRITES
        .iter()
        .fold(tag.to_string(), |tag, (key, value)| tag.replace(key, value))
}

/// Strip every tag from `utterance`.
pub fn remove_ssml(utterance: &str) -> String {
    TAG.replace_all(utterance, "").replace("  ", " ")
}

/// Keep tags that mention one of `supported_tags`, rewritten with `modify`,
/// and drop the rest.
pub fn validate_ssml<F>(utterance: &str, supported_tags: &[&str], modify: F) -> String
where
    F: Fn(&str) -> String,
{
    if supported_tags.is_empty() {
        return remove_ssml(utterance);
    }

    TAG.replace_all(utterance, |caps: &regex::Captures<'_>| {
        let tag = &caps[0];
        if supported_tags.iter().any(|s| tag.contains(s)) {
            modify(tag)
        } else {
            String::new()
        }
    })
    .replace("  ", " ")
}
