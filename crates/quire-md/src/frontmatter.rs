//! Frontmatter removal.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

/// A `---` delimited block at the very start of a note.
static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?sm)\A---[ \t]*\r?\n(.*?)(?:\r?\n)?^---[ \t]*(?:\r?\n|\z)")
        .unwrap()
});

/// The parts of an Obsidian properties block that quire understands.
///
/// Everything else in the block is ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Tags listed under `tags:`, either as a list or a single string
    #[serde(default, deserialize_with = "tags_or_string")]
    pub tags: Vec<String>,
}

fn tags_or_string<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        One(String),
        Many(Vec<String>),
        Nothing(Option<()>),
    }

    let tags = match Tags::deserialize(deserializer)? {
        Tags::One(tag) => tag
            .split([',', ' '])
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        Tags::Many(tags) => tags,
        Tags::Nothing(_) => Vec::new(),
    };

    Ok(tags
        .into_iter()
        .map(|t| t.trim().trim_start_matches('#').to_string())
        .filter(|t| !t.is_empty())
        .collect())
}

/// Remove a leading frontmatter block.
///
/// Returns the remaining text and whatever could be read from the block.
/// A block that is not valid YAML is still removed; it just yields no data.
pub fn strip_frontmatter(text: &str) -> (&str, Frontmatter) {
    let Some(caps) = BLOCK.captures(text) else {
        return (text, Frontmatter::default());
    };

    let yaml = caps.get(1).map_or("", |m| m.as_str());
    let frontmatter = serde_yaml::from_str::<Option<Frontmatter>>(yaml)
        .ok()
        .flatten()
        .unwrap_or_default();

    let end = caps.get(0).map_or(0, |m| m.end());
    (&text[end..], frontmatter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn removes_block_with_delimiters() {
        let source = "---\naliases: [x]\ncreated: 2024-01-01\n---\n# Title\n";

        let (rest, fm) = strip_frontmatter(source);

        assert_eq!(rest, "# Title\n");
        assert!(fm.tags.is_empty());
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\n---\nnot: frontmatter\n---\n";

        let (rest, _) = strip_frontmatter(source);

        assert_eq!(rest, source);
    }

    #[test]
    fn reads_tag_list() {
        let source = "---\ntags:\n  - travel\n  - \"#food\"\n---\nBody";

        let (rest, fm) = strip_frontmatter(source);

        assert_eq!(rest, "Body");
        assert_eq!(fm.tags, vec!["travel", "food"]);
    }

    #[test]
    fn reads_tag_string() {
        let (_, fm) = strip_frontmatter("---\ntags: travel, food\n---\n");

        assert_eq!(fm.tags, vec!["travel", "food"]);
    }

    #[test]
    fn invalid_yaml_is_still_removed() {
        let (rest, fm) = strip_frontmatter("---\ntitle: [unclosed\n---\nBody");

        assert_eq!(rest, "Body");
        assert_eq!(fm, Frontmatter::default());
    }

    #[test]
    fn empty_block_is_removed() {
        let (rest, _) = strip_frontmatter("---\n---\nBody");

        assert_eq!(rest, "Body");
    }

    #[test]
    fn unclosed_block_is_kept() {
        let source = "---\ntitle: Test\n# No closing";

        let (rest, _) = strip_frontmatter(source);

        assert_eq!(rest, source);
    }
}
