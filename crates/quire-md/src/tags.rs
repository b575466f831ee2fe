//! Hashtag extraction and stripping.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\w+)").unwrap());

/// A run of tags (and the whitespace following them) at the start of a note.
static LEADING_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A(?:#\w+\s*)+").unwrap());

/// URL-shaped substrings. Hashes inside them are fragments, not tags.
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+|www\.\S+").unwrap());

/// Collect the tags of a note and strip their markers from the text.
///
/// Tags at the very start of the note are removed together with the whitespace
/// after them. Any other `#tag` keeps its text and only loses the `#`. Text
/// inside URLs is copied unchanged and never contributes tags.
pub fn extract_tags(text: &str) -> (String, BTreeSet<String>) {
    let mut tags = BTreeSet::new();

    let leading_end = LEADING_TAGS.find(text).map_or(0, |m| m.end());
    for caps in TAG.captures_iter(&text[..leading_end]) {
        tags.insert(caps[1].to_string());
    }

    let body = &text[leading_end..];
    let mut out = String::with_capacity(body.len());
    let mut last = 0;

    for url in URL.find_iter(body) {
        strip_markers(&body[last..url.start()], &mut out, &mut tags);
        out.push_str(url.as_str());
        last = url.end();
    }
    strip_markers(&body[last..], &mut out, &mut tags);

    (out, tags)
}

fn strip_markers(segment: &str, out: &mut String, tags: &mut BTreeSet<String>) {
    let stripped = TAG.replace_all(segment, |caps: &Captures| {
        tags.insert(caps[1].to_string());
        caps[1].to_string()
    });
    out.push_str(&stripped);
}
