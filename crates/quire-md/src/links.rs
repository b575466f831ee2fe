//! Wiki link and embed resolution.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static EMBED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[(.*?)(?:\|(.*?))?\]\]").unwrap());

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[(.*?)(?:\|(.*?))?\]\]").unwrap());

const IMAGE_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".webp"];

/// Rewrite `[[target|label]]` links and `![[target|label]]` embeds into
/// standard markdown.
///
/// A labelled embed of an image becomes an `<img>` sized by the label, which
/// is how Obsidian spells `![[photo.png|300]]`.
pub fn resolve_wiki_links(text: &str) -> String {
    let embedded = EMBED.replace_all(text, |caps: &Captures| {
        let target = &caps[1];
        match caps.get(2).map(|m| m.as_str()) {
            Some(width) if !width.is_empty() && is_image(target) => {
                format!(r#"<img src="{target}" width="{width}">"#)
            }
            Some(label) if !label.is_empty() => {
                format!("![{label}]({})", destination(target))
            }
            _ => format!("![{target}]({})", destination(target)),
        }
    });

    LINK.replace_all(&embedded, |caps: &Captures| {
        let target = &caps[1];
        let label = caps
            .get(2)
            .map(|m| m.as_str())
            .filter(|l| !l.is_empty())
            .unwrap_or(target);
        format!("[{label}]({})", destination(target))
    })
    .into_owned()
}

fn is_image(target: &str) -> bool {
    let lower = target.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Link destinations with spaces are only valid in the `<...>` form.
fn destination(target: &str) -> String {
    if target.contains(char::is_whitespace) {
        format!("<{target}>")
    } else {
        target.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_link_uses_target_as_label() {
        assert_eq!(resolve_wiki_links("see [[Note]]."), "see [Note](Note).");
    }

    #[test]
    fn labelled_link() {
        assert_eq!(
            resolve_wiki_links("[[Note|See this]]"),
            "[See this](Note)"
        );
    }

    #[test]
    fn sized_image_embed() {
        assert_eq!(
            resolve_wiki_links("![[diagram.png|300]]"),
            r#"<img src="diagram.png" width="300">"#
        );
    }

    #[test]
    fn unlabelled_embed() {
        assert_eq!(
            resolve_wiki_links("![[diagram.png]]"),
            "![diagram.png](diagram.png)"
        );
    }

    #[test]
    fn labelled_non_image_embed() {
        assert_eq!(
            resolve_wiki_links("![[talk.pdf|Slides]]"),
            "![Slides](talk.pdf)"
        );
    }

    #[test]
    fn image_extension_is_case_insensitive() {
        assert_eq!(
            resolve_wiki_links("![[Photo.JPG|120]]"),
            r#"<img src="Photo.JPG" width="120">"#
        );
    }

    #[test]
    fn targets_with_spaces_use_angle_brackets() {
        assert_eq!(
            resolve_wiki_links("[[My Note]]"),
            "[My Note](<My Note>)"
        );
    }

    #[test]
    fn multiple_links_on_one_line() {
        assert_eq!(
            resolve_wiki_links("[[a]] and [[b|B]]"),
            "[a](a) and [B](b)"
        );
    }
}
