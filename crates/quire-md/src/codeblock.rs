//! Fenced code block normalization.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(\w+)?\n(.*?)```").unwrap());

/// Language class used when a fence has no info string.
pub const DEFAULT_LANGUAGE: &str = "plaintext";

/// Rewrite fenced blocks into `<pre><code class="language-…">` markup for
/// highlight.js.
///
/// The content is not escaped, so markup inside a fence reaches the page as-is.
pub fn replace_code_blocks(text: &str) -> String {
    FENCE
        .replace_all(text, |caps: &Captures| {
            let language = caps.get(1).map_or(DEFAULT_LANGUAGE, |m| m.as_str());
            format!(
                r#"<pre><code class="language-{language}">{}</code></pre>"#,
                &caps[2]
            )
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_language() {
        let source = "```rust\nfn main() {}\n```\n";

        assert_eq!(
            replace_code_blocks(source),
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
        );
    }

    #[test]
    fn defaults_to_plaintext() {
        let source = "```\nplain\n```";

        assert_eq!(
            replace_code_blocks(source),
            "<pre><code class=\"language-plaintext\">plain\n</code></pre>"
        );
    }

    #[test]
    fn content_is_not_escaped() {
        let out = replace_code_blocks("```html\n<b>x</b>\n```");

        assert!(out.contains("<b>x</b>"));
    }

    #[test]
    fn handles_several_blocks() {
        let source = "```py\na\n```\ntext\n```\nb\n```";
        let out = replace_code_blocks(source);

        assert_eq!(out.matches("<pre>").count(), 2);
        assert!(out.contains("language-py"));
        assert!(out.contains("language-plaintext"));
        assert!(out.contains("\ntext\n"));
    }
}
