//! Asset pipeline: stylesheets, icon, images and the pages subtree.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Icon written when the config does not name one.
const BUNDLED_ICON: &[u8] = include_bytes!("../assets/icon.png");

/// Syntax highlighting theme for highlight.js.
const MONOKAI_CSS: &str = include_str!("../assets/monokai.css");

/// Image extensions copied from the top of the source directory.
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Directory of supplementary files mirrored into the output.
pub const PAGES_DIR: &str = "pages";

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Create `dir` if needed and delete every file directly inside it.
    ///
    /// Subdirectories are left alone; `pages/` is replaced separately.
    pub fn clear_output(dir: &Path) -> io::Result<usize> {
        fs::create_dir_all(dir)?;

        let mut removed = 0;
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }

        Ok(removed)
    }

    /// Write `styles/opa.css` and `styles/monokai.css`.
    pub fn write_styles(output_dir: &Path, css: &str, minify: bool) -> io::Result<()> {
        let styles_dir = output_dir.join("styles");
        fs::create_dir_all(&styles_dir)?;

        let css = if minify {
            Self::minify_css(css).unwrap_or_else(|e| {
                tracing::warn!("Writing unminified stylesheet: {}", e);
                css.to_string()
            })
        } else {
            css.to_string()
        };

        fs::write(styles_dir.join("opa.css"), css)?;
        fs::write(styles_dir.join("monokai.css"), MONOKAI_CSS)?;

        Ok(())
    }

    /// Contents of the configured icon, or the bundled one.
    pub fn load_icon(icon: Option<&Path>) -> io::Result<Vec<u8>> {
        match icon {
            Some(path) => fs::read(path),
            None => Ok(BUNDLED_ICON.to_vec()),
        }
    }

    /// Copy images directly inside `source_dir` to `output_dir`.
    pub fn copy_images(source_dir: &Path, output_dir: &Path) -> io::Result<usize> {
        let mut copied = 0;

        for entry in WalkDir::new(source_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_image(entry.path()) {
                continue;
            }

            fs::copy(entry.path(), output_dir.join(entry.file_name()))?;
            copied += 1;
        }

        Ok(copied)
    }

    /// Replace `output_dir/pages` with a copy of `source_dir/pages`.
    ///
    /// Returns `false` when the source has no `pages/` directory.
    pub fn copy_pages(source_dir: &Path, output_dir: &Path) -> io::Result<bool> {
        let source = source_dir.join(PAGES_DIR);
        let target = output_dir.join(PAGES_DIR);

        if target.exists() {
            fs::remove_dir_all(&target)?;
        }

        if !source.is_dir() {
            return Ok(false);
        }

        for entry in WalkDir::new(&source) {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(&source)
                .map_err(io::Error::other)?;
            let dest = target.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest)?;
            } else {
                fs::copy(entry.path(), &dest)?;
            }
        }

        Ok(true)
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|i| ext.eq_ignore_ascii_case(i)))
}
