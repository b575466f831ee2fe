//! The ordered rewrite pipeline.

use std::collections::BTreeSet;

use crate::callout::replace_callouts;
use crate::codeblock::replace_code_blocks;
use crate::frontmatter::strip_frontmatter;
use crate::links::resolve_wiki_links;
use crate::table::replace_tables;
use crate::tags::extract_tags;

/// A text-to-text rewrite step.
pub type Rewrite = fn(&str) -> String;

/// Rewrites that run after tags and frontmatter have been handled, in order.
///
/// Later steps rely on the output of earlier ones: tables and callouts are
/// matched after links have already become standard markdown.
pub const REWRITES: [(&str, Rewrite); 4] = [
    ("wiki-links", resolve_wiki_links),
    ("code-blocks", replace_code_blocks),
    ("tables", replace_tables),
    ("callouts", replace_callouts),
];

/// A note after rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    /// Markdown ready for [`crate::html::to_html`]
    pub text: String,

    /// Tags found in the note text and its frontmatter
    pub tags: BTreeSet<String>,
}

/// Run the full rewrite pipeline over one note.
///
/// Never fails: constructs that do not match a rule are left as they are.
pub fn transform(raw: &str) -> Transformed {
    let (text, mut tags) = extract_tags(raw);

    let (text, frontmatter) = strip_frontmatter(&text);
    tags.extend(frontmatter.tags);

    let text = REWRITES
        .iter()
        .fold(text.to_string(), |text, (_, rewrite)| rewrite(&text));

    Transformed { text, tags }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_note() {
        let source = r#"---
created: 2024-05-01
tags: [journal]
---
Trip notes about #travel, see [[Packing List|the list]].

![[map.png|400]]

```bash
echo hi
```

| Day | Place |
|-----|-------|
| 1 | Lyon |

> [!note] Reminder
> Book the train.
"#;

        let out = transform(source);

        assert_eq!(
            out.tags.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["journal", "travel"]
        );
        assert!(!out.text.contains("created:"));
        assert!(out.text.starts_with("Trip notes about travel, see [the list](<Packing List>)."));
        assert!(out.text.contains(r#"<img src="map.png" width="400">"#));
        assert!(out.text.contains("<pre><code class=\"language-bash\">echo hi\n</code></pre>"));
        assert!(out.text.contains("<th>Day</th><th>Place</th>"));
        assert!(out.text.contains("<tr><td>1</td><td>Lyon</td></tr>"));
        assert!(out.text.contains("!!! note \"Reminder\"\n    Book the train.\n"));
    }

    #[test]
    fn leading_tags_are_removed() {
        let out = transform("#draft #ideas Something to think about.");

        assert_eq!(out.text, "Something to think about.");
        assert_eq!(out.tags.len(), 2);
    }

    #[test]
    fn url_fragments_survive_the_pipeline() {
        let out = transform("Docs at http://example.com/#demo here.");

        assert_eq!(out.text, "Docs at http://example.com/#demo here.");
        assert!(out.tags.is_empty());
    }

    #[test]
    fn tags_inside_code_fences_are_rewritten() {
        // Rewrites are pattern based, fences get no special protection.
        let out = transform("```\nx = 1 #comment\n```");

        assert!(out.text.contains("x = 1 comment"));
        assert!(out.tags.contains("comment"));
    }

    #[test]
    fn is_deterministic() {
        let source = "#a text [[b]] | x |\n|---|\n| y |\n";

        assert_eq!(transform(source), transform(source));
    }

    #[test]
    fn rewrites_run_in_declared_order() {
        let names: Vec<_> = REWRITES.iter().map(|(name, _)| *name).collect();

        assert_eq!(names, vec!["wiki-links", "code-blocks", "tables", "callouts"]);
    }
}
