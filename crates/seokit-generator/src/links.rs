//! Page URLs and hreflang link sets.
//!
//! Shared by the meta tag engine and the sitemap so both emit the same
//! canonical URLs and alternate links.

use serde::{Deserialize, Serialize};
use seokit_core::{ContentRecord, LanguageMapper};

/// Hreflang value marking the fallback page.
pub const X_DEFAULT: &str = "x-default";

/// One hreflang entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HreflangLink {
    /// Hreflang tag (e.g. `zh-CN`) or `x-default`.
    pub lang: String,
    pub url: String,
}

/// Builds page URLs. The default language is served without a prefix.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base_url: String,
    default_language: String,
}

impl UrlBuilder {
    pub fn new(base_url: impl Into<String>, default_language: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            default_language: default_language.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// `{base}/{slug}` for the default language, `{base}/{lang}/{slug}` otherwise.
    pub fn url_for(&self, slug: &str, language: &str) -> String {
        let slug = slug.trim_start_matches('/');
        if language.is_empty() || language.eq_ignore_ascii_case(&self.default_language) {
            format!("{}/{}", self.base_url, slug)
        } else {
            format!("{}/{}/{}", self.base_url, language, slug)
        }
    }

    /// Canonical URL of a record.
    pub fn canonical(&self, record: &ContentRecord) -> String {
        self.url_for(&record.slug, &record.language)
    }

    /// Absolute URL for a path below the site root.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Hreflang set for a record.
    ///
    /// The record itself comes first, then each alternate in a different
    /// language, then one `x-default` entry that points at the
    /// default-language version when there is one and at the record otherwise.
    pub fn hreflang_links(&self, record: &ContentRecord, languages: &LanguageMapper) -> Vec<HreflangLink> {
        let self_url = self.canonical(record);
        let mut default_url = record
            .language
            .eq_ignore_ascii_case(&self.default_language)
            .then(|| self_url.clone());

        let mut links = vec![HreflangLink {
            lang: languages.hreflang(&record.language),
            url: self_url.clone(),
        }];

        for alt in &record.alternate_languages {
            if alt.language.eq_ignore_ascii_case(&record.language) {
                continue;
            }
            let url = self.url_for(&alt.slug, &alt.language);
            if default_url.is_none() && alt.language.eq_ignore_ascii_case(&self.default_language) {
                default_url = Some(url.clone());
            }
            links.push(HreflangLink {
                lang: languages.hreflang(&alt.language),
                url,
            });
        }

        links.push(HreflangLink {
            lang: X_DEFAULT.to_string(),
            url: default_url.unwrap_or(self_url),
        });

        links
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use seokit_core::{AlternateLanguage, ContentType, Status};

    use super::*;

    fn record(language: &str, alternates: &[&str]) -> ContentRecord {
        ContentRecord {
            id: "1".to_string(),
            slug: "blog/post".to_string(),
            language: language.to_string(),
            content_type: ContentType::Blog,
            title: "Post".to_string(),
            excerpt: String::new(),
            body: String::new(),
            category: None,
            tags: Vec::new(),
            author: None,
            featured_image: None,
            published_at: Utc::now(),
            updated_at: Utc::now(),
            status: Status::Published,
            alternate_languages: alternates
                .iter()
                .map(|lang| AlternateLanguage::new(*lang, "blog/post"))
                .collect(),
            images: Vec::new(),
            pricing: None,
            noindex: false,
        }
    }

    #[test]
    fn test_url_for() {
        let urls = UrlBuilder::new("https://seasalt.ai/", "en");
        assert_eq!(urls.url_for("blog/post", "en"), "https://seasalt.ai/blog/post");
        assert_eq!(urls.url_for("blog/post", "zh"), "https://seasalt.ai/zh/blog/post");
        assert_eq!(urls.url_for("/about", "ja"), "https://seasalt.ai/ja/about");
        assert_eq!(urls.absolute("/sitemap.xml"), "https://seasalt.ai/sitemap.xml");
    }

    #[test]
    fn test_hreflang_self_first_and_single_x_default() {
        let urls = UrlBuilder::new("https://seasalt.ai", "en");
        let mapper = LanguageMapper::builtin();
        let links = urls.hreflang_links(&record("zh", &["en", "ja"]), &mapper);

        assert_eq!(links[0].lang, "zh-CN");
        assert_eq!(links[0].url, "https://seasalt.ai/zh/blog/post");
        assert_eq!(links[1].lang, "en");
        assert_eq!(links[2].lang, "ja-JP");
        assert_eq!(links.iter().filter(|l| l.lang == X_DEFAULT).count(), 1);

        let x_default = links.last().expect("x-default");
        assert_eq!(x_default.lang, X_DEFAULT);
        assert_eq!(x_default.url, "https://seasalt.ai/blog/post");
    }

    #[test]
    fn test_hreflang_x_default_falls_back_to_self() {
        let urls = UrlBuilder::new("https://seasalt.ai", "en");
        let mapper = LanguageMapper::builtin();
        let links = urls.hreflang_links(&record("zh", &["ja"]), &mapper);
        assert_eq!(links.len(), 3);
        assert_eq!(links[2].url, "https://seasalt.ai/zh/blog/post");
    }

    #[test]
    fn test_hreflang_skips_own_language_alternates() {
        let urls = UrlBuilder::new("https://seasalt.ai", "en");
        let mapper = LanguageMapper::builtin();
        let links = urls.hreflang_links(&record("en", &["en", "zh"]), &mapper);
        let langs: Vec<_> = links.iter().map(|l| l.lang.as_str()).collect();
        assert_eq!(langs, vec!["en", "zh-CN", X_DEFAULT]);
    }

    #[test]
    fn test_hreflang_without_alternates() {
        let urls = UrlBuilder::new("https://seasalt.ai", "en");
        let mapper = LanguageMapper::builtin();
        let links = urls.hreflang_links(&record("en", &[]), &mapper);
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].url, links[0].url);
    }
}
