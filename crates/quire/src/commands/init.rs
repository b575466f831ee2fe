//! Initialize a notes directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use quire_static::DEFAULT_CONFIG;

/// Run the init command.
pub async fn run(dir: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing quire in {}...", dir.display());

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let config_path = dir.join("quire.toml");
    if config_path.exists() && !yes {
        tracing::warn!("quire.toml already exists. Use --yes to overwrite.");
    } else {
        fs::write(&config_path, DEFAULT_CONFIG).context("Failed to write quire.toml")?;
        tracing::info!("Created {}", config_path.display());
    }

    let notes_dir = dir.join("notes");
    fs::create_dir_all(&notes_dir).context("Failed to create notes directory")?;

    let welcome_path = notes_dir.join("Welcome.md");
    if welcome_path.exists() && !yes {
        tracing::warn!("notes/Welcome.md already exists. Use --yes to overwrite.");
    } else {
        fs::write(&welcome_path, SAMPLE_NOTE).context("Failed to write Welcome.md")?;
        tracing::info!("Created {}", welcome_path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'quire serve notes site --config quire.toml' to preview the site.");

    Ok(())
}

const SAMPLE_NOTE: &str = r#"#welcome #quire
# Welcome

This site is generated from the notes in this folder. Every `.md` file next
to this one becomes a page, listed on the home page newest first.

## Tags

Tags like #example are collected for the home page and shown as badges.
Tags at the very start of a note are removed from the text. Notes tagged
with `hidden` are rendered but left off the home page.

## Links and images

Link to other notes with [[Welcome]] or [[Welcome|a custom label]]. Images
placed next to the notes are embedded the same way with a leading `!`, and
an optional width after the bar.

## Callouts

> [!note] Tip
> Callouts become highlighted boxes.

## Tables

| Syntax | Result |
|--------|--------|
| `**bold**` | **bold** |
| `*italic*` | *italic* |

## Code

```rust
fn main() {
    println!("hello");
}
```

## Math

Inline $e^{i\pi} + 1 = 0$ and display math:

$$\int_0^1 x^2 dx = \frac{1}{3}$$
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_config_and_sample_note() {
        let temp = tempdir().unwrap();

        run(temp.path(), false).await.unwrap();

        let config = fs::read_to_string(temp.path().join("quire.toml")).unwrap();
        assert_eq!(config, DEFAULT_CONFIG);
        assert!(temp.path().join("notes").join("Welcome.md").exists());
    }

    #[tokio::test]
    async fn keeps_existing_files_without_yes() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("quire.toml"), "custom").unwrap();

        run(temp.path(), false).await.unwrap();

        let config = fs::read_to_string(temp.path().join("quire.toml")).unwrap();
        assert_eq!(config, "custom");
    }

    #[tokio::test]
    async fn overwrites_with_yes() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("quire.toml"), "custom").unwrap();

        run(temp.path(), true).await.unwrap();

        let config = fs::read_to_string(temp.path().join("quire.toml")).unwrap();
        assert_eq!(config, DEFAULT_CONFIG);
    }

    #[tokio::test]
    async fn initialized_directory_builds() {
        let temp = tempdir().unwrap();
        run(temp.path(), false).await.unwrap();

        let builder = quire_static::SiteBuilder::new(quire_static::BuildConfig {
            source_dir: temp.path().join("notes"),
            output_dir: temp.path().join("site"),
            config_path: Some(temp.path().join("quire.toml")),
        });
        let result = builder.rebuild_from_config().unwrap();

        assert_eq!(result.pages.len(), 1);
        assert_eq!(result.pages[0].tags, vec!["example", "quire", "welcome"]);

        let page = fs::read_to_string(temp.path().join("site").join("Welcome.html")).unwrap();
        assert!(page.contains("<div class=\"admonition note\">"));
        assert!(page.contains("<table class=\"table-bordered\">"));
    }
}
