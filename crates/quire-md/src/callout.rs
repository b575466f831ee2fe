//! Obsidian callouts to admonition blocks.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `> [!type] Title` followed by `>` continuation lines. The title is optional.
static CALLOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^> \[!(\w+)\](?:[ \t]+(.+?))?[ \t]*(?:\r?\n|\z)((?:^>.*(?:\r?\n|\z))*)")
        .unwrap()
});

/// Rewrite callouts into the `!!! type "Title"` admonition form understood by
/// [`crate::html::to_html`].
pub fn replace_callouts(text: &str) -> String {
    CALLOUT
        .replace_all(text, |caps: &Captures| {
            let mut block = match caps.get(2) {
                Some(title) => format!("!!! {} \"{}\"\n", &caps[1], title.as_str()),
                None => format!("!!! {}\n", &caps[1]),
            };
            for line in caps[3].lines() {
                let content = line.strip_prefix('>').unwrap_or(line);
                let content = content.strip_prefix(' ').unwrap_or(content);
                if content.trim().is_empty() {
                    block.push('\n');
                } else {
                    block.push_str("    ");
                    block.push_str(content);
                    block.push('\n');
                }
            }
            block.push('\n');
            block
        })
        .into_owned()
}
