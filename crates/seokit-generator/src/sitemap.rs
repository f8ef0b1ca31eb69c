//! Sitemap generation.
//!
//! Writes one XML sitemap per language (split into numbered files when a
//! language exceeds the per-file URL limit) plus a sitemap index, then
//! notifies search engines.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use seokit_core::{Config, ContentRecord, ContentType, LanguageMapper};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    links::UrlBuilder,
    notify::{LogNotifier, SitemapNotifier},
    source::{Clock, ContentSource, SourceError, SystemClock},
};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";

/// Directory below the output directory holding per-language sitemaps.
pub const SITEMAPS_DIR: &str = "sitemaps";

/// File name of the sitemap index.
pub const INDEX_FILE: &str = "sitemap.xml";

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// Content could not be loaded.
    #[error("failed to load content: {0}")]
    Source(#[from] SourceError),

    /// A sitemap file could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Change frequency for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// One written sitemap file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapFile {
    pub language: String,
    pub path: PathBuf,
    pub url: String,
    pub lastmod: String,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapRun {
    pub success: bool,
    pub sitemaps: Vec<SitemapFile>,
    /// Path of the index; `None` when there was nothing to write.
    pub index: Option<PathBuf>,
}

/// Sitemap generator.
pub struct SitemapGenerator {
    source: Arc<dyn ContentSource>,
    languages: Arc<LanguageMapper>,
    urls: UrlBuilder,
    output_dir: PathBuf,
    max_urls_per_sitemap: usize,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn SitemapNotifier>,
}

impl std::fmt::Debug for SitemapGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SitemapGenerator")
            .field("source", &self.source.name())
            .field("base_url", &self.urls.base_url())
            .field("output_dir", &self.output_dir)
            .field("max_urls_per_sitemap", &self.max_urls_per_sitemap)
            .finish_non_exhaustive()
    }
}

impl SitemapGenerator {
    /// Create a generator for the configured site with the system clock and
    /// a logging notifier.
    pub fn new(config: &Config, source: Arc<dyn ContentSource>, languages: Arc<LanguageMapper>) -> Self {
        Self {
            source,
            languages,
            urls: UrlBuilder::new(config.site.base_url(), config.site.default_language.clone()),
            output_dir: config.sitemap.output_dir.clone(),
            max_urls_per_sitemap: config.sitemap.max_urls_per_sitemap,
            clock: Arc::new(SystemClock),
            notifier: Arc::new(LogNotifier::new(config.sitemap.ping_engines.clone())),
        }
    }

    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn SitemapNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generate every sitemap and the index.
    pub async fn generate_all(&self) -> Result<SitemapRun> {
        info!(source = self.source.name(), "starting sitemap generation");

        let records = self.source.all_published().await?;
        if records.is_empty() {
            warn!("no published content, skipping sitemap generation");
            return Ok(SitemapRun {
                success: true,
                sitemaps: Vec::new(),
                index: None,
            });
        }

        let now = self.clock.now();
        let lastmod = iso8601(&now);
        let sitemaps_dir = self.output_dir.join(SITEMAPS_DIR);
        create_dir(&sitemaps_dir).await?;

        let mut files = Vec::new();
        let mut documents = Vec::new();

        for (language, items) in group_by_language(&records) {
            let chunks = chunk(&items, self.max_urls_per_sitemap);
            let numbered = chunks.len() > 1;

            for (n, chunk) in chunks.into_iter().enumerate() {
                let identifier = if numbered {
                    format!("{language}-{}", n + 1)
                } else {
                    language.to_string()
                };
                let name = format!("sitemap-{identifier}.xml");
                let path = sitemaps_dir.join(&name);

                debug!(language, urls = chunk.len(), file = %name, "building sitemap");
                documents.push((path.clone(), self.urlset_xml(chunk, now)));
                files.push(SitemapFile {
                    language: language.to_string(),
                    path,
                    url: self.urls.absolute(&format!("{SITEMAPS_DIR}/{name}")),
                    lastmod: lastmod.clone(),
                });
            }
        }

        try_join_all(documents.iter().map(|(path, xml)| write_file(path, xml))).await?;

        let index_path = self.output_dir.join(INDEX_FILE);
        write_file(&index_path, &index_xml(&files)).await?;

        let index_url = self.urls.absolute(INDEX_FILE);
        if let Err(e) = self.notifier.notify(&index_url).await {
            warn!(error = %e, "search engine notification failed");
        }

        info!(files = files.len(), index = %index_path.display(), "generated sitemaps");

        Ok(SitemapRun {
            success: true,
            sitemaps: files,
            index: Some(index_path),
        })
    }

    /// Build a `<urlset>` document for records of one language.
    pub fn urlset_xml(&self, records: &[&ContentRecord], now: DateTime<Utc>) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<urlset xmlns="{SITEMAP_NS}" xmlns:xhtml="{XHTML_NS}" xmlns:image="{IMAGE_NS}">"#
        ));
        xml.push('\n');

        for record in records {
            xml.push_str(&self.url_to_xml(record, now));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    fn url_to_xml(&self, record: &ContentRecord, now: DateTime<Utc>) -> String {
        let mut xml = String::from("  <url>\n");

        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&self.urls.canonical(record))
        ));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            iso8601(&record.updated_at)
        ));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            changefreq(record.content_type).as_str()
        ));
        xml.push_str(&format!(
            "    <priority>{:.1}</priority>\n",
            priority(record, now)
        ));

        if !record.alternate_languages.is_empty() {
            for link in self.urls.hreflang_links(record, &self.languages) {
                xml.push_str(&format!(
                    r#"    <xhtml:link rel="alternate" hreflang="{}" href="{}" />"#,
                    escape_xml(&link.lang),
                    escape_xml(&link.url)
                ));
                xml.push('\n');
            }
        }

        for image in &record.images {
            xml.push_str("    <image:image>\n");
            xml.push_str(&format!(
                "      <image:loc>{}</image:loc>\n",
                escape_xml(&image.url)
            ));
            if !image.title.is_empty() {
                xml.push_str(&format!(
                    "      <image:title>{}</image:title>\n",
                    escape_xml(&image.title)
                ));
            }
            if !image.caption.is_empty() {
                xml.push_str(&format!(
                    "      <image:caption>{}</image:caption>\n",
                    escape_xml(&image.caption)
                ));
            }
            xml.push_str("    </image:image>\n");
        }

        xml.push_str("  </url>\n");
        xml
    }
}

/// Build the sitemap index listing `files`.
pub fn index_xml(files: &[SitemapFile]) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<sitemapindex xmlns="{SITEMAP_NS}">"#));
    xml.push('\n');

    for file in files {
        xml.push_str("  <sitemap>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&file.url)));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", file.lastmod));
        xml.push_str("  </sitemap>\n");
    }

    xml.push_str("</sitemapindex>\n");
    xml
}

/// Language a record is grouped under when it names none.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Group records by language, keeping first-seen language order.
///
/// Records with an empty language are grouped under [`FALLBACK_LANGUAGE`].
pub fn group_by_language(records: &[ContentRecord]) -> Vec<(&str, Vec<&ContentRecord>)> {
    let mut groups: Vec<(&str, Vec<&ContentRecord>)> = Vec::new();
    for record in records {
        let key = if record.language.is_empty() {
            FALLBACK_LANGUAGE
        } else {
            record.language.as_str()
        };
        match groups.iter_mut().find(|(lang, _)| *lang == key) {
            Some((_, items)) => items.push(record),
            None => groups.push((key, vec![record])),
        }
    }
    groups
}

/// Split `items` into consecutive slices of at most `size` elements.
pub fn chunk<T>(items: &[T], size: usize) -> Vec<&[T]> {
    items.chunks(size.max(1)).collect()
}

/// Sitemap priority from content type and age, rounded to one decimal.
pub fn priority(record: &ContentRecord, now: DateTime<Utc>) -> f64 {
    let base: f64 = match record.content_type {
        ContentType::Landing => 1.0,
        ContentType::Product => 0.9,
        ContentType::Blog => 0.7,
        ContentType::Docs => 0.6,
        ContentType::Page => 0.5,
    };

    let days_old = (now - record.published_at).num_seconds() as f64 / 86_400.0;
    let adjusted = if days_old < 7.0 {
        base + 0.2
    } else if days_old < 30.0 {
        base + 0.1
    } else if days_old > 365.0 {
        (base - 0.1).max(0.3)
    } else {
        base
    };

    (adjusted.clamp(0.0, 1.0) * 10.0).round() / 10.0
}

/// Expected change frequency for a content type.
pub fn changefreq(content_type: ContentType) -> ChangeFreq {
    match content_type {
        ContentType::Landing | ContentType::Product | ContentType::Docs => ChangeFreq::Weekly,
        ContentType::Blog | ContentType::Page => ChangeFreq::Monthly,
    }
}

fn iso8601(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn create_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| SitemapError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| SitemapError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Escape special XML characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
