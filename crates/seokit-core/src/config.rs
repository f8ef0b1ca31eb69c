//! Site configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for seokit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Content source settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Sitemap output settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// Language table and template locations.
    #[serde(default)]
    pub seo: SeoConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site name, used as `{{siteName}}` and as the publisher name.
    #[serde(default = "default_site_name")]
    pub name: String,

    /// Base URL for the site (e.g., "https://example.com").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Language whose URLs carry no language prefix.
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Fallback Open Graph / Twitter image. Defaults to `{base_url}/og-image.jpg`.
    #[serde(default)]
    pub default_image: Option<String>,

    /// Author used when a content file does not name one.
    #[serde(default)]
    pub default_author: Option<String>,
}

/// Content source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root of the Markdown content tree.
    #[serde(default = "default_content_dir")]
    pub dir: PathBuf,

    /// Lifetime of the parsed-content cache, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

/// Sitemap output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Output directory; sitemaps land in `{output_dir}/sitemaps/`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Maximum URLs written to a single sitemap file.
    #[serde(default = "default_max_urls")]
    pub max_urls_per_sitemap: usize,

    /// Ping endpoints; `{sitemap}` is replaced by the encoded index URL.
    #[serde(default = "default_ping_engines")]
    pub ping_engines: Vec<String>,
}

/// Locations of the language table and SEO templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeoConfig {
    /// JSON language table. The built-in table is used when unset.
    #[serde(default)]
    pub languages_file: Option<PathBuf>,

    /// JSON SEO templates. The built-in templates are used when unset.
    #[serde(default)]
    pub templates_file: Option<PathBuf>,
}

// Default value functions
fn default_site_name() -> String {
    "Seasalt.AI".to_string()
}

fn default_base_url() -> String {
    "https://seasalt.ai".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_cache_ttl_secs() -> u64 {
    300 // 5 minutes
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_max_urls() -> usize {
    50_000
}

fn default_ping_engines() -> Vec<String> {
    vec![
        "https://www.google.com/ping?sitemap={sitemap}".to_string(),
        "https://www.bing.com/ping?sitemap={sitemap}".to_string(),
    ]
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            base_url: default_base_url(),
            default_language: default_language(),
            default_image: None,
            default_author: None,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_urls_per_sitemap: default_max_urls(),
            ping_engines: default_ping_engines(),
        }
    }
}

impl SiteConfig {
    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Image used when content has no featured image.
    pub fn default_image(&self) -> String {
        self.default_image
            .clone()
            .unwrap_or_else(|| format!("{}/og-image.jpg", self.base_url()))
    }

    /// Author name used when content does not name one.
    pub fn default_author(&self) -> String {
        self.default_author
            .clone()
            .unwrap_or_else(|| format!("{} Team", self.name))
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, with `SEOKIT__` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("SEOKIT").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site.name.is_empty() {
            return Err(CoreError::config("site.name cannot be empty"));
        }

        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if self.sitemap.max_urls_per_sitemap == 0 {
            return Err(CoreError::config(
                "sitemap.max_urls_per_sitemap must be greater than zero",
            ));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        Ok(())
    }
}
