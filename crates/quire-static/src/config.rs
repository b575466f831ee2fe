//! Site configuration (quire.toml).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration used when no config file is given.
pub const DEFAULT_CONFIG: &str = include_str!("../assets/default.toml");

/// Site configuration, grouped by concern.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SiteConfig {
    pub style: StyleConfig,
    pub content: ContentConfig,
    pub security: SecurityConfig,
    #[serde(default)]
    pub build: BuildSettings,
}

/// Colors and sizes used by the generated stylesheet.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StyleConfig {
    pub dark_bg: String,
    pub text: String,
    pub link: String,
    pub link_hover: String,
    pub code_bg: String,
    pub bold: String,
    pub italic: String,
    pub tag_bg: String,
    /// Viewport width (px) below which the branding header is hidden
    pub mobile_width: u32,
    pub search_border: String,
    pub search_border_size: u32,
    pub search_bg: String,
    pub search_text: String,
    pub search_border_focus: String,
}

/// Branding, home page text, legal identity and social links.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ContentConfig {
    /// Site title, shown in the browser tab and the branding header
    pub title: String,
    pub home_title: String,
    pub welcome_text: String,

    // Impressum
    pub name: String,
    pub address: String,
    pub email: String,

    #[serde(default)]
    pub ko_fi: String,
    #[serde(default)]
    pub soundcloud: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub youtube: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub discord: String,
    #[serde(default)]
    pub github: String,

    /// Site icon; the bundled icon is used when unset
    #[serde(default)]
    pub icon: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SecurityConfig {
    /// Secret part of the rebuild trigger path
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BuildSettings {
    /// Minify the generated stylesheet
    #[serde(default = "default_minify")]
    pub minify: bool,
}

fn default_minify() -> bool {
    true
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl SiteConfig {
    /// Load configuration from `path`, or the bundled default when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::bundled());
        };

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The configuration bundled with quire.
    pub fn bundled() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("bundled default.toml is valid")
    }

    /// Social links that have a URL set, as `(icon class, href)` pairs.
    pub fn social_links(&self) -> Vec<(&'static str, String)> {
        let c = &self.content;
        let links = [
            ("fas fa-coffee", &c.ko_fi),
            ("fab fa-soundcloud", &c.soundcloud),
            ("fab fa-instagram", &c.instagram),
            ("fab fa-youtube", &c.youtube),
            ("fab fa-linkedin", &c.linkedin),
            ("fab fa-discord", &c.discord),
            ("fab fa-github", &c.github),
        ];

        let mut out: Vec<_> = links
            .into_iter()
            .filter(|(_, url)| !url.is_empty())
            .map(|(icon, url)| (icon, url.clone()))
            .collect();

        if !c.email.is_empty() {
            out.push(("fas fa-envelope", format!("mailto:{}", c.email)));
        }

        out
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::bundled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn bundled_config_parses() {
        let config = SiteConfig::bundled();

        assert_eq!(config.security.password, "password");
        assert!(config.build.minify);
        assert!(config.style.mobile_width > 0);
    }

    #[test]
    fn missing_path_uses_bundled() {
        assert_eq!(SiteConfig::load(None).unwrap(), SiteConfig::bundled());
    }

    #[test]
    fn loads_from_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("quire.toml");
        let custom = DEFAULT_CONFIG.replace("title = \"Notes\"", "title = \"Field Notes\"");
        fs::write(&path, custom).unwrap();

        let config = SiteConfig::load(Some(&path)).unwrap();

        assert_eq!(config.content.title, "Field Notes");
    }

    #[test]
    fn missing_key_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("quire.toml");
        fs::write(&path, DEFAULT_CONFIG.replace("password = \"password\"", "")).unwrap();

        let result = SiteConfig::load(Some(&path));

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let result = SiteConfig::load(Some(Path::new("/nonexistent/quire.toml")));

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn social_links_skip_empty_urls() {
        let mut config = SiteConfig::bundled();
        config.content.github = "https://github.com/jane".to_string();

        let links = config.social_links();

        assert_eq!(
            links,
            vec![
                ("fab fa-github", "https://github.com/jane".to_string()),
                ("fas fa-envelope", "mailto:jane@example.com".to_string()),
            ]
        );
    }
}
