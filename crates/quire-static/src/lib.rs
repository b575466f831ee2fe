//! Static site generator for quire.
//!
//! Renders a directory of Obsidian notes into standalone HTML pages with a
//! searchable index, and tracks note fingerprints for change detection.

pub mod assets;
pub mod builder;
pub mod config;
pub mod document;
pub mod fingerprint;
pub mod renderer;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, SiteBuilder};
pub use config::{ConfigError, SiteConfig, DEFAULT_CONFIG};
pub use document::{Document, Page};
pub use fingerprint::{diff, has_changed, scan, Change, Fingerprint, FingerprintSet};
pub use renderer::{Rendered, Renderer};
