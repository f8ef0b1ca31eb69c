//! In-memory fixture source for development and tests.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use seokit_core::{
    AlternateLanguage, Author, ContentRecord, ContentType, ImageRef, Pricing, Status,
};

use super::{ContentSource, Result};

/// Serves a fixed set of records.
#[derive(Debug, Clone)]
pub struct MockContentSource {
    records: Vec<ContentRecord>,
}

impl Default for MockContentSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockContentSource {
    /// Source over the built-in three-record fixture.
    pub fn new() -> Self {
        Self {
            records: fixture(),
        }
    }

    /// Source over caller-supplied records.
    pub fn with_records(records: Vec<ContentRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ContentSource for MockContentSource {
    async fn all_published(&self) -> Result<Vec<ContentRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.is_published())
            .cloned()
            .collect())
    }

    async fn by_slug(&self, slug: &str, language: &str) -> Result<Option<ContentRecord>> {
        Ok(self
            .records
            .iter()
            .find(|r| r.slug == slug && r.language == language)
            .cloned())
    }

    async fn by_id(&self, id: &str) -> Result<Option<ContentRecord>> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

fn fixture() -> Vec<ContentRecord> {
    let ai_trends = "blog/ai-trends-2025";
    let chatbot = "products/chatbot-platform";

    vec![
        ContentRecord {
            id: "1".to_string(),
            slug: ai_trends.to_string(),
            language: "en".to_string(),
            content_type: ContentType::Blog,
            title: "AI Trends in 2025".to_string(),
            excerpt: "Discover the latest trends in artificial intelligence and how they will shape the future.".to_string(),
            body: "# AI Trends in 2025\n\nArtificial intelligence continues to evolve...".to_string(),
            category: Some("Technology".to_string()),
            tags: vec!["AI".to_string(), "Trends".to_string()],
            author: Some(Author::new("John Doe")),
            featured_image: Some("https://seasalt.ai/images/ai-trends.jpg".to_string()),
            published_at: date(2025, 1, 15),
            updated_at: date(2025, 1, 15),
            status: Status::Published,
            alternate_languages: vec![
                AlternateLanguage::new("zh", ai_trends),
                AlternateLanguage::new("ja", ai_trends),
            ],
            images: vec![ImageRef {
                url: "https://seasalt.ai/images/ai-trends.jpg".to_string(),
                title: "AI Trends".to_string(),
                caption: "The future of AI".to_string(),
            }],
            pricing: None,
            noindex: false,
        },
        ContentRecord {
            id: "2".to_string(),
            slug: ai_trends.to_string(),
            language: "zh".to_string(),
            content_type: ContentType::Blog,
            title: "2025年AI趋势".to_string(),
            excerpt: "探索人工智能的最新趋势以及它们如何塑造未来。".to_string(),
            body: "# 2025年AI趋势\n\n人工智能继续发展...".to_string(),
            category: Some("技术".to_string()),
            tags: vec!["AI".to_string()],
            author: Some(Author::new("John Doe")),
            featured_image: Some("https://seasalt.ai/images/ai-trends.jpg".to_string()),
            published_at: date(2025, 1, 15),
            updated_at: date(2025, 1, 15),
            status: Status::Published,
            alternate_languages: vec![
                AlternateLanguage::new("en", ai_trends),
                AlternateLanguage::new("ja", ai_trends),
            ],
            images: Vec::new(),
            pricing: None,
            noindex: false,
        },
        ContentRecord {
            id: "3".to_string(),
            slug: chatbot.to_string(),
            language: "en".to_string(),
            content_type: ContentType::Product,
            title: "Seasalt Chatbot Platform".to_string(),
            excerpt: "Build intelligent chatbots with our powerful AI platform.".to_string(),
            body: "# Seasalt Chatbot Platform\n\nOur chatbot platform allows you to...".to_string(),
            category: Some("Products".to_string()),
            tags: Vec::new(),
            author: None,
            featured_image: Some("https://seasalt.ai/images/chatbot.jpg".to_string()),
            published_at: date(2024, 12, 1),
            updated_at: date(2025, 1, 10),
            status: Status::Published,
            alternate_languages: vec![AlternateLanguage::new("zh", chatbot)],
            images: Vec::new(),
            pricing: Some(Pricing {
                amount: "99".to_string(),
                currency: "USD".to_string(),
            }),
            noindex: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_all_published() {
        let source = MockContentSource::new();
        let records = source.all_published().await.expect("records");
        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn test_all_published_skips_drafts() {
        let mut records = fixture();
        records[2].status = Status::Draft;
        let source = MockContentSource::with_records(records);
        assert_eq!(source.all_published().await.expect("records").len(), 2);
    }

    #[tokio::test]
    async fn test_by_slug() {
        let source = MockContentSource::new();
        let zh = source
            .by_slug("blog/ai-trends-2025", "zh")
            .await
            .expect("lookup")
            .expect("found");
        assert_eq!(zh.id, "2");

        let missing = source
            .by_slug("blog/ai-trends-2025", "ja")
            .await
            .expect("lookup");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_by_id() {
        let source = MockContentSource::new();
        let product = source.by_id("3").await.expect("lookup").expect("found");
        assert_eq!(product.content_type, ContentType::Product);
        assert_eq!(product.pricing.map(|p| p.amount).as_deref(), Some("99"));
        assert!(source.by_id("404").await.expect("lookup").is_none());
    }
}
