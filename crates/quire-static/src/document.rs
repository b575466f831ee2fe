//! Source notes and the page metadata derived from them.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use walkdir::WalkDir;

/// Extension of source notes.
pub const SOURCE_EXTENSION: &str = "md";

/// Extension of generated pages.
pub const PAGE_EXTENSION: &str = "html";

/// A source note, read once per build.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
    pub modified: SystemTime,
    /// Creation time, or the modification time where the platform has none
    pub created: SystemTime,
}

impl Document {
    /// Read a note and its timestamps from disk.
    pub fn read(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        let metadata = fs::metadata(path)?;
        let modified = metadata.modified()?;
        let created = metadata.created().unwrap_or(modified);

        Ok(Self {
            path: path.to_path_buf(),
            text,
            modified,
            created,
        })
    }

    /// Name of the generated page: the file stem with the page extension.
    pub fn output_name(&self) -> String {
        output_name(&self.path)
    }
}

/// `notes/Trip.md` -> `Trip.html`
pub fn output_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");
    format!("{stem}.{PAGE_EXTENSION}")
}

/// File name of a note, e.g. `Trip.md`.
pub fn note_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// Notes directly inside `dir`, sorted by file name. Names that are not
/// valid UTF-8 are skipped.
///
/// Both change detection and the rebuild use this listing, so they always
/// agree on which files make up the site.
pub fn list_documents(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
            continue;
        }

        if note_name(path).is_none() {
            tracing::warn!("Skipping {}: file name is not valid UTF-8", path.display());
            continue;
        }

        paths.push(path.to_path_buf());
    }

    Ok(paths)
}

/// Index metadata for one rendered note.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Page {
    /// Output file name, e.g. `Trip.html`
    pub file_name: String,
    /// Card title: the file name without the page extension
    pub title: String,
    pub tags: Vec<String>,
    /// Creation date as shown on the card (`dd.mm.yyyy`)
    pub date: String,
    /// Carries a `hidden` tag and is not listed by default
    pub hidden: bool,
    #[serde(skip)]
    pub timestamp: SystemTime,
}

impl Page {
    pub fn new(file_name: String, tags: BTreeSet<String>, created: SystemTime) -> Self {
        let title = file_name
            .strip_suffix(&format!(".{PAGE_EXTENSION}"))
            .unwrap_or(&file_name)
            .to_string();
        let hidden = tags.iter().any(|t| t.eq_ignore_ascii_case("hidden"));

        Self {
            title,
            file_name,
            tags: tags.into_iter().collect(),
            date: format_date(created),
            hidden,
            timestamp: created,
        }
    }
}

/// Most recent first. The sort is stable, so equal timestamps keep their
/// listing order.
pub fn sort_pages(pages: &mut [Page]) {
    pages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

fn format_date(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%d.%m.%Y").to_string()
}
