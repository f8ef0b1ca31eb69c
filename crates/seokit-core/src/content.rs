//! Content records and their component types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of page a content record renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Blog,
    Product,
    Docs,
    Landing,
    #[default]
    Page,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Product => "product",
            Self::Docs => "docs",
            Self::Landing => "landing",
            Self::Page => "page",
        }
    }

    /// Parse a type name, falling back to [`ContentType::Page`].
    pub fn from_str_lossy(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "blog" | "post" | "posts" => Self::Blog,
            "product" | "products" => Self::Product,
            "docs" | "doc" | "documentation" => Self::Docs,
            "landing" => Self::Landing,
            _ => Self::Page,
        }
    }

    /// Infer the type from a relative content path by substring match.
    pub fn from_path(relative: &str) -> Self {
        let lower = relative.to_lowercase();
        [Self::Blog, Self::Product, Self::Docs, Self::Landing]
            .into_iter()
            .find(|ty| lower.contains(ty.as_str()))
            .unwrap_or(Self::Page)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Draft,
    #[default]
    Published,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published)
    }
}

/// Content author.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A translation of a record in another language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateLanguage {
    pub language: String,
    pub slug: String,
}

impl AlternateLanguage {
    pub fn new(language: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            slug: slug.into(),
        }
    }
}

/// An image referenced by a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub caption: String,
}

/// Product pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    pub amount: String,
    pub currency: String,
}

/// A single piece of content in one language.
///
/// `(slug, language)` identifies a record. Alternates are taken as given and
/// are not checked for reciprocity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// Stable identifier.
    pub id: String,

    /// URL slug without language prefix.
    pub slug: String,

    /// ISO language code.
    pub language: String,

    pub content_type: ContentType,

    pub title: String,

    #[serde(default)]
    pub excerpt: String,

    /// Markdown body without frontmatter.
    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub author: Option<Author>,

    #[serde(default)]
    pub featured_image: Option<String>,

    pub published_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub alternate_languages: Vec<AlternateLanguage>,

    #[serde(default)]
    pub images: Vec<ImageRef>,

    #[serde(default)]
    pub pricing: Option<Pricing>,

    /// Explicitly excluded from indexing.
    #[serde(default)]
    pub noindex: bool,
}

impl ContentRecord {
    pub fn is_published(&self) -> bool {
        self.status.is_published()
    }

    pub fn is_draft(&self) -> bool {
        matches!(self.status, Status::Draft)
    }

    /// Author name, if any.
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()
            .map(|a| a.name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample() -> ContentRecord {
        let date = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap();
        ContentRecord {
            id: "1".to_string(),
            slug: "blog/ai-trends-2025".to_string(),
            language: "en".to_string(),
            content_type: ContentType::Blog,
            title: "AI Trends in 2025".to_string(),
            excerpt: String::new(),
            body: String::new(),
            category: Some("Technology".to_string()),
            tags: vec!["AI".to_string()],
            author: Some(Author::new("John Doe")),
            featured_image: None,
            published_at: date,
            updated_at: date,
            status: Status::Published,
            alternate_languages: vec![AlternateLanguage::new("zh", "blog/ai-trends-2025")],
            images: Vec::new(),
            pricing: None,
            noindex: false,
        }
    }

    #[test]
    fn test_content_type_from_str_lossy() {
        assert_eq!(ContentType::from_str_lossy("blog"), ContentType::Blog);
        assert_eq!(ContentType::from_str_lossy("Product"), ContentType::Product);
        assert_eq!(ContentType::from_str_lossy("docs"), ContentType::Docs);
        assert_eq!(ContentType::from_str_lossy("landing"), ContentType::Landing);
        assert_eq!(ContentType::from_str_lossy("whatever"), ContentType::Page);
    }

    #[test]
    fn test_content_type_from_path() {
        assert_eq!(ContentType::from_path("en/blog/post.md"), ContentType::Blog);
        assert_eq!(
            ContentType::from_path("products/chatbot.md"),
            ContentType::Product
        );
        assert_eq!(ContentType::from_path("docs/api/intro.md"), ContentType::Docs);
        assert_eq!(ContentType::from_path("landing/home.md"), ContentType::Landing);
        assert_eq!(ContentType::from_path("about.md"), ContentType::Page);
    }

    #[test]
    fn test_record_helpers() {
        let record = sample();
        assert!(record.is_published());
        assert!(!record.is_draft());
        assert_eq!(record.author_name(), Some("John Doe"));
        assert!(record.has_tag("ai"));
        assert!(!record.has_tag("ml"));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(json["contentType"], "blog");
        assert_eq!(json["status"], "published");
        assert_eq!(json["alternateLanguages"][0]["language"], "zh");
        assert!(json.get("publishedAt").is_some());
    }
}
