//! Renders one note into a standalone HTML page.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use quire_md::{to_html, transform};

use crate::builder::BuildError;
use crate::config::SiteConfig;
use crate::document::Document;
use crate::templates::TemplateEngine;

/// Outcome of rendering one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Output file name relative to the output directory
    pub file_name: String,
    pub tags: BTreeSet<String>,
}

/// Turns documents into pages inside an output directory.
pub struct Renderer<'a> {
    templates: &'a TemplateEngine,
    site: &'a SiteConfig,
}

impl<'a> Renderer<'a> {
    pub fn new(templates: &'a TemplateEngine, site: &'a SiteConfig) -> Self {
        Self { templates, site }
    }

    /// Rewrite, convert and wrap `doc`, then write it to `output_dir`.
    ///
    /// Overwrites any previous page of the same name. Rendering the same
    /// document twice produces identical bytes.
    pub fn render(&self, doc: &Document, output_dir: &Path) -> Result<Rendered, BuildError> {
        let (rendered, html) = self.render_to_string(doc)?;
        let output_path = output_dir.join(&rendered.file_name);

        fs::write(&output_path, html)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", output_path.display(), e)))?;

        Ok(rendered)
    }

    /// The page for `doc`, without touching the disk.
    pub fn render_to_string(&self, doc: &Document) -> Result<(Rendered, String), BuildError> {
        let transformed = transform(&doc.text);
        let content = to_html(&transformed.text);

        let html = self
            .templates
            .render_page(self.site, &content)
            .map_err(|e: minijinja::Error| BuildError::TemplateError(e.to_string()))?;

        let file_name = doc.output_name();
        tracing::debug!("Rendered {} -> {}", doc.path.display(), file_name);

        let rendered = Rendered {
            file_name,
            tags: transformed.tags,
        };

        Ok((rendered, html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn render(source: &str) -> (Rendered, String) {
        let temp = tempdir().unwrap();
        let note = temp.path().join("Trip.md");
        fs::write(&note, source).unwrap();

        let templates = TemplateEngine::new();
        let site = SiteConfig::bundled();
        let doc = Document::read(&note).unwrap();

        let rendered = Renderer::new(&templates, &site)
            .render(&doc, temp.path())
            .unwrap();
        let html = fs::read_to_string(temp.path().join(&rendered.file_name)).unwrap();

        (rendered, html)
    }

    #[test]
    fn renders_note_into_shell() {
        let (rendered, html) = render("#travel Packing for **Lyon**.\n");

        assert_eq!(rendered.file_name, "Trip.html");
        assert!(rendered.tags.contains("travel"));
        assert!(html.contains("<p>Packing for <strong>Lyon</strong>.</p>"));
        assert!(html.contains("<div class=\"container\">"));
        assert!(html.contains("styles/opa.css"));
    }

    #[test]
    fn renders_callout_as_admonition() {
        let (_, html) = render("> [!warning] Careful\n> Hot surface.\n");

        assert!(html.contains("<div class=\"admonition warning\">"));
        assert!(html.contains("<p class=\"admonition-title\">Careful</p>"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let temp = tempdir().unwrap();
        let note = temp.path().join("a.md");
        fs::write(&note, "# Title\n\nSome #tag text with [[Link]].\n").unwrap();

        let templates = TemplateEngine::new();
        let site = SiteConfig::bundled();
        let renderer = Renderer::new(&templates, &site);
        let doc = Document::read(&note).unwrap();

        renderer.render(&doc, temp.path()).unwrap();
        let first = fs::read(temp.path().join("a.html")).unwrap();
        renderer.render(&doc, temp.path()).unwrap();
        let second = fs::read(temp.path().join("a.html")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn missing_output_dir_is_a_write_error() {
        let temp = tempdir().unwrap();
        let note = temp.path().join("a.md");
        fs::write(&note, "text").unwrap();

        let templates = TemplateEngine::new();
        let site = SiteConfig::bundled();
        let doc = Document::read(&note).unwrap();

        let result = Renderer::new(&templates, &site).render(&doc, &temp.path().join("missing"));

        assert!(matches!(result, Err(BuildError::WriteError(_))));
    }
}
