//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use rayon::prelude::*;

use crate::assets::AssetPipeline;
use crate::config::{ConfigError, SiteConfig};
use crate::document::{list_documents, note_name, sort_pages, Document, Page};
use crate::fingerprint::{Fingerprint, FingerprintSet};
use crate::renderer::Renderer;
use crate::templates::TemplateEngine;

/// Configuration for building a site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory holding the markdown notes
    pub source_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Site config file; the bundled default is used when `None`
    pub config_path: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("notes"),
            output_dir: PathBuf::from("site"),
            config_path: None,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Fingerprints of the notes this build rendered
    pub fingerprints: FingerprintSet,

    /// Index entries, most recent first
    pub pages: Vec<Page>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read notes: {0}")]
    ReadError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Regenerates the whole site from the source directory.
///
/// Rebuilds hold an internal lock, so concurrent callers run one after the
/// other.
pub struct SiteBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
    lock: Mutex<()>,
}

impl SiteBuilder {
    /// Create a new site builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
            lock: Mutex::new(()),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.config.source_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Load the site config named in the build config.
    pub fn load_site_config(&self) -> Result<SiteConfig, BuildError> {
        Ok(SiteConfig::load(self.config.config_path.as_deref())?)
    }

    /// Re-read the site config, then rebuild.
    pub fn rebuild_from_config(&self) -> Result<BuildResult, BuildError> {
        let site = self.load_site_config()?;
        self.rebuild(&site)
    }

    /// Regenerate every page, the index, the impressum and all assets.
    ///
    /// Notes are read and rendered in memory before the output directory is
    /// touched, so a note that cannot be read or rendered leaves the previous
    /// site in place.
    pub fn rebuild(&self, site: &SiteConfig) -> Result<BuildResult, BuildError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let start = Instant::now();

        let source_dir = &self.config.source_dir;
        let output_dir = &self.config.output_dir;

        let paths = list_documents(source_dir)
            .map_err(|e| BuildError::ReadError(format!("{}: {}", source_dir.display(), e)))?;

        let renderer = Renderer::new(&self.templates, site);
        let rendered: Vec<(Page, String, String, Fingerprint)> = paths
            .par_iter()
            .map(|path| -> Result<_, BuildError> {
                let doc = Document::read(path)
                    .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;
                let (out, html) = renderer.render_to_string(&doc)?;

                let name = note_name(path)
                    .ok_or_else(|| {
                        BuildError::ReadError(format!("{}: invalid file name", path.display()))
                    })?
                    .to_string();
                let fingerprint = Fingerprint::compute(path, doc.modified);

                Ok((
                    Page::new(out.file_name, out.tags, doc.created),
                    html,
                    name,
                    fingerprint,
                ))
            })
            .collect::<Result<_, _>>()?;

        let mut pages = Vec::with_capacity(rendered.len());
        let mut documents = Vec::with_capacity(rendered.len());
        let mut fingerprints = FingerprintSet::new();
        for (page, html, name, fingerprint) in rendered {
            documents.push((page.file_name.clone(), html));
            pages.push(page);
            fingerprints.insert(name, fingerprint);
        }

        sort_pages(&mut pages);

        let index = self
            .templates
            .render_index(site, &pages)
            .map_err(|e: minijinja::Error| BuildError::TemplateError(e.to_string()))?;
        let impressum = self
            .templates
            .render_impressum(site)
            .map_err(|e: minijinja::Error| BuildError::TemplateError(e.to_string()))?;
        let css = self
            .templates
            .render_stylesheet(&site.style)
            .map_err(|e: minijinja::Error| BuildError::TemplateError(e.to_string()))?;

        let icon_path = self.icon_path(site);
        let icon = AssetPipeline::load_icon(icon_path.as_deref()).map_err(|e| {
            let shown = icon_path.as_deref().unwrap_or(Path::new("icon"));
            BuildError::ReadError(format!("{}: {}", shown.display(), e))
        })?;

        let removed = AssetPipeline::clear_output(output_dir)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", output_dir.display(), e)))?;
        tracing::debug!("Cleared {} files from {}", removed, output_dir.display());

        for (file_name, html) in documents {
            self.write_file(&file_name, html)?;
        }
        self.write_file("index.html", index)?;
        self.write_file("impressum.html", impressum)?;
        self.write_file("icon.png", icon)?;
        self.write_assets(site, &css)?;

        let duration = start.elapsed();

        tracing::info!(
            "Built {} pages in {}ms",
            pages.len(),
            duration.as_millis()
        );

        Ok(BuildResult {
            fingerprints,
            pages,
            duration_ms: duration.as_millis() as u64,
            output_dir: output_dir.clone(),
        })
    }

    /// The configured icon, relative paths taken from the config file's
    /// directory.
    fn icon_path(&self, site: &SiteConfig) -> Option<PathBuf> {
        let icon = site.content.icon.as_deref()?;

        match self.config.config_path.as_deref().and_then(Path::parent) {
            Some(dir) if icon.is_relative() => Some(dir.join(icon)),
            _ => Some(icon.to_path_buf()),
        }
    }

    /// Images, the pages subtree and stylesheets.
    fn write_assets(&self, site: &SiteConfig, css: &str) -> Result<(), BuildError> {
        let source_dir = &self.config.source_dir;
        let output_dir = &self.config.output_dir;
        let write_err = |e: std::io::Error| BuildError::WriteError(e.to_string());

        let images = AssetPipeline::copy_images(source_dir, output_dir).map_err(write_err)?;
        if images > 0 {
            tracing::debug!("Copied {} images", images);
        }

        if AssetPipeline::copy_pages(source_dir, output_dir).map_err(write_err)? {
            tracing::debug!("Copied pages directory");
        }

        AssetPipeline::write_styles(output_dir, css, site.build.minify).map_err(write_err)
    }

    fn write_file(&self, name: &str, contents: impl AsRef<[u8]>) -> Result<(), BuildError> {
        let path = self.config.output_dir.join(name);

        fs::write(&path, contents)
            .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
    }
}
