//! Markdown-directory content source with a TTL cache.

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use chrono::Duration;
use seokit_core::{ContentRecord, ContentType};
use seokit_parser::MarkdownParser;
use tracing::{debug, info};

use super::{
    ContentSource, Result,
    cache::TtlCache,
    clock::{Clock, SystemClock},
};

/// Cache key for the published set.
const ALL_PUBLISHED: &str = "all_published";

/// Default cache lifetime.
pub const DEFAULT_TTL: Duration = Duration::minutes(5);

/// Serves records parsed from a Markdown directory.
///
/// The published set is cached; the filtered queries work on the cached set.
#[derive(Debug)]
pub struct MarkdownContentSource {
    parser: MarkdownParser,
    content_dir: PathBuf,
    cache: TtlCache<Vec<ContentRecord>>,
}

impl MarkdownContentSource {
    /// Source with the default TTL and the system clock.
    pub fn new(parser: MarkdownParser, content_dir: impl Into<PathBuf>) -> Self {
        Self::with_cache(parser, content_dir, DEFAULT_TTL, Arc::new(SystemClock))
    }

    /// Source with an explicit TTL and clock.
    pub fn with_cache(
        parser: MarkdownParser,
        content_dir: impl Into<PathBuf>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            parser,
            content_dir: content_dir.into(),
            cache: TtlCache::new(ttl, clock),
        }
    }

    /// Drop all cached results.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    async fn load(&self) -> Result<Vec<ContentRecord>> {
        let parser = self.parser.clone();
        let dir = self.content_dir.clone();

        let records = tokio::task::spawn_blocking(move || parser.parse_directory(&dir)).await?;
        let published: Vec<ContentRecord> = records.into_iter().filter(|r| r.is_published()).collect();

        info!(
            dir = %self.content_dir.display(),
            count = published.len(),
            "loaded published markdown content"
        );
        Ok(published)
    }

    async fn filtered<F>(&self, keep: F) -> Result<Vec<ContentRecord>>
    where
        F: Fn(&ContentRecord) -> bool + Send,
    {
        Ok(self
            .all_published()
            .await?
            .into_iter()
            .filter(|r| keep(r))
            .collect())
    }

    pub async fn by_category(&self, category: &str) -> Result<Vec<ContentRecord>> {
        self.filtered(|r| r.category.as_deref() == Some(category))
            .await
    }

    pub async fn by_tag(&self, tag: &str) -> Result<Vec<ContentRecord>> {
        self.filtered(|r| r.has_tag(tag)).await
    }

    pub async fn by_language(&self, language: &str) -> Result<Vec<ContentRecord>> {
        self.filtered(|r| r.language == language).await
    }

    pub async fn by_content_type(&self, content_type: ContentType) -> Result<Vec<ContentRecord>> {
        self.filtered(|r| r.content_type == content_type).await
    }
}

#[async_trait]
impl ContentSource for MarkdownContentSource {
    async fn all_published(&self) -> Result<Vec<ContentRecord>> {
        if let Some(cached) = self.cache.get(ALL_PUBLISHED) {
            debug!(count = cached.len(), "content cache hit");
            return Ok(cached);
        }

        let published = self.load().await?;
        self.cache.insert(ALL_PUBLISHED, published.clone());
        Ok(published)
    }

    async fn by_slug(&self, slug: &str, language: &str) -> Result<Option<ContentRecord>> {
        Ok(self
            .all_published()
            .await?
            .into_iter()
            .find(|r| r.slug == slug && r.language == language))
    }

    async fn by_id(&self, id: &str) -> Result<Option<ContentRecord>> {
        Ok(self.all_published().await?.into_iter().find(|r| r.id == id))
    }

    fn name(&self) -> &'static str {
        "markdown"
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::{TimeZone, Utc};
    use seokit_parser::ParserConfig;

    use super::*;
    use crate::source::clock::ManualClock;

    fn write(root: &std::path::Path, rel: &str, body: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, body).expect("write");
    }

    fn source(root: &std::path::Path, clock: Arc<ManualClock>) -> MarkdownContentSource {
        let parser = MarkdownParser::new(ParserConfig {
            base_dir: root.to_path_buf(),
            ..ParserConfig::default()
        });
        MarkdownContentSource::with_cache(parser, root, DEFAULT_TTL, clock)
    }

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path();
        write(
            root,
            "en/blog/first.md",
            "---\ncategory: Technology\ntags: [ai, ml]\n---\n# First\n\nHello.",
        );
        write(root, "zh/blog/first.md", "# 第一\n\n你好。");
        write(root, "en/docs/guide.md", "# Guide\n\nRead me.");
        write(root, "en/blog/draft.md", "---\ndraft: true\n---\n# Draft");
        dir
    }

    #[tokio::test]
    async fn test_all_published_excludes_drafts() {
        let dir = site();
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let source = source(dir.path(), Arc::new(ManualClock::new(start)));

        let records = source.all_published().await.expect("load");
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.title != "Draft"));
    }

    #[tokio::test]
    async fn test_cache_respects_ttl() {
        let dir = site();
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        let source = source(dir.path(), clock.clone());

        assert_eq!(source.all_published().await.expect("load").len(), 3);

        write(dir.path(), "en/landing/home.md", "# Home\n\nWelcome.");

        clock.advance(Duration::minutes(4));
        assert_eq!(source.all_published().await.expect("cached").len(), 3);

        clock.advance(Duration::minutes(2));
        assert_eq!(source.all_published().await.expect("reload").len(), 4);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_reload() {
        let dir = site();
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let source = source(dir.path(), Arc::new(ManualClock::new(start)));

        assert_eq!(source.all_published().await.expect("load").len(), 3);
        fs::remove_file(dir.path().join("en/docs/guide.md")).expect("remove");
        assert_eq!(source.all_published().await.expect("cached").len(), 3);

        source.clear_cache();
        assert_eq!(source.all_published().await.expect("reload").len(), 2);
    }

    #[tokio::test]
    async fn test_queries() {
        let dir = site();
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let source = source(dir.path(), Arc::new(ManualClock::new(start)));

        let first = source
            .by_slug("blog/first", "zh")
            .await
            .expect("lookup")
            .expect("found");
        assert_eq!(first.title, "第一");
        assert!(source.by_slug("blog/first", "ja").await.expect("lookup").is_none());

        let by_id = source.by_id(&first.id).await.expect("lookup").expect("found");
        assert_eq!(by_id.slug, "blog/first");

        assert_eq!(source.by_category("Technology").await.expect("query").len(), 1);
        assert_eq!(source.by_tag("ml").await.expect("query").len(), 1);
        assert_eq!(source.by_language("en").await.expect("query").len(), 2);
        assert_eq!(
            source
                .by_content_type(ContentType::Docs)
                .await
                .expect("query")
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_by_tag_reads_cached_published_set() {
        let dir = site();
        write(dir.path(), "en/blog/hidden.md", "---\ndraft: true\ntags: [ml]\n---\n# Hidden");
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let source = source(dir.path(), Arc::new(ManualClock::new(start)));

        let tagged = source.by_tag("ML").await.expect("query");
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].title, "First");

        fs::remove_file(dir.path().join("en/blog/first.md")).expect("remove");
        assert_eq!(source.by_tag("ai").await.expect("cached").len(), 1);
        assert!(source.by_tag("rust").await.expect("query").is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty() {
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        let source = source(
            std::path::Path::new("/nonexistent/content"),
            Arc::new(ManualClock::new(start)),
        );
        assert!(source.all_published().await.expect("load").is_empty());
    }
}
