//! Meta tag generation.
//!
//! Produces the title, description, canonical URL, hreflang set, Open Graph
//! and Twitter card fields, JSON-LD structured data and robots directive for
//! one content record.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use seokit_core::{
    Config, ContentRecord, ContentType, LanguageMapper,
    text::{collapse_whitespace, truncate_for_language},
};
use tracing::debug;

use crate::{
    links::{HreflangLink, UrlBuilder},
    template::{ResolvedTemplate, SeoTemplates, TemplateContext, apply_template},
};

/// Longest excerpt derived from a record body.
const BODY_EXCERPT_MAX: usize = 160;

const ROBOTS_INDEX: &str = "index, follow";
const ROBOTS_NOINDEX: &str = "noindex, nofollow";

/// Open Graph fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    #[serde(rename = "type")]
    pub og_type: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
    pub locale: String,
    pub alternate_locales: Vec<String>,
}

/// Twitter card fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterCard {
    pub card: String,
    pub title: String,
    pub description: String,
    pub image: String,
}

/// Everything a page head needs for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTags {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub hreflang: Vec<HreflangLink>,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub schema: Value,
    pub robots: String,
}

/// Generates [`MetaTags`] from content records.
#[derive(Debug, Clone)]
pub struct MetaTagEngine {
    templates: SeoTemplates,
    urls: UrlBuilder,
    languages: Arc<LanguageMapper>,
    site_name: String,
    default_image: String,
    default_author: String,
}

impl MetaTagEngine {
    /// Create an engine for the configured site.
    pub fn new(config: &Config, templates: SeoTemplates, languages: Arc<LanguageMapper>) -> Self {
        let site = &config.site;
        Self {
            templates,
            urls: UrlBuilder::new(site.base_url(), site.default_language.clone()),
            languages,
            site_name: site.name.clone(),
            default_image: site.default_image(),
            default_author: site.default_author(),
        }
    }

    /// Create an engine, loading the templates file named in the config.
    pub fn from_config(config: &Config, languages: Arc<LanguageMapper>) -> seokit_core::Result<Self> {
        let templates = SeoTemplates::load_or_default(config.seo.templates_file.as_deref())?;
        Ok(Self::new(config, templates, languages))
    }

    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    pub fn languages(&self) -> &LanguageMapper {
        &self.languages
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    /// Generate meta tags for `record`. Variables in `context` override the
    /// ones derived from the record.
    pub fn generate(&self, record: &ContentRecord, context: &TemplateContext) -> MetaTags {
        let language = record.language.as_str();
        let template = self.templates.resolve(record.content_type, language);
        let vars = self.variables(record, context);

        let title = apply_template(template.title(), &vars);
        let description = apply_template(template.description(), &vars);
        let canonical = self.urls.canonical(record);
        let hreflang = self.urls.hreflang_links(record, &self.languages);

        let image = record
            .featured_image
            .clone()
            .unwrap_or_else(|| self.default_image.clone());

        let open_graph = OpenGraph {
            og_type: og_type(record.content_type).to_string(),
            title: apply_template(template.og_title(), &vars),
            description: apply_template(template.og_description(), &vars),
            image: image.clone(),
            url: canonical.clone(),
            locale: self.languages.og_locale(language),
            alternate_locales: self.alternate_locales(record),
        };

        let twitter = self.twitter_card(record, &template, &vars, image);
        let schema = self.schema(record, &vars, &canonical);

        debug!(slug = %record.slug, language, "generated meta tags");

        MetaTags {
            title: truncate_for_language(&title, template.limits.title_max, language),
            description: truncate_for_language(&description, template.limits.description_max, language),
            canonical,
            hreflang,
            open_graph,
            twitter,
            schema,
            robots: robots(record).to_string(),
        }
    }

    fn variables(&self, record: &ContentRecord, context: &TemplateContext) -> TemplateContext {
        let excerpt = if record.excerpt.trim().is_empty() {
            excerpt_from_body(&record.body)
        } else {
            record.excerpt.clone()
        };

        let mut vars = TemplateContext::new()
            .with_var("title", record.title.clone())
            .with_var("excerpt", excerpt)
            .with_var("category", record.category.clone().unwrap_or_default())
            .with_var("author", record.author_name().unwrap_or_default())
            .with_var("siteName", self.site_name.clone());
        vars.extend(context);
        vars
    }

    fn alternate_locales(&self, record: &ContentRecord) -> Vec<String> {
        let mut locales: Vec<String> = Vec::new();
        for alt in &record.alternate_languages {
            if alt.language.eq_ignore_ascii_case(&record.language) {
                continue;
            }
            let locale = self.languages.og_locale(&alt.language);
            if !locales.contains(&locale) {
                locales.push(locale);
            }
        }
        locales
    }

    fn twitter_card(
        &self,
        record: &ContentRecord,
        template: &ResolvedTemplate,
        vars: &TemplateContext,
        image: String,
    ) -> TwitterCard {
        let card = if record.featured_image.is_some() {
            "summary_large_image"
        } else {
            "summary"
        };
        TwitterCard {
            card: card.to_string(),
            title: apply_template(template.twitter_title(), vars),
            description: apply_template(template.twitter_description(), vars),
            image,
        }
    }

    fn schema(&self, record: &ContentRecord, vars: &TemplateContext, canonical: &str) -> Value {
        let var = |key: &str| vars.get(key).filter(|v| !v.is_empty()).map(str::to_string);

        let mut schema = Map::new();
        schema.insert("@context".into(), json!("https://schema.org"));
        schema.insert("@type".into(), json!(schema_type(record.content_type)));
        insert_opt(&mut schema, "headline", var("title"));
        insert_opt(&mut schema, "description", var("excerpt"));
        schema.insert("url".into(), json!(canonical));
        schema.insert("datePublished".into(), json!(iso_millis(&record.published_at)));
        schema.insert("dateModified".into(), json!(iso_millis(&record.updated_at)));

        match record.content_type {
            ContentType::Blog => {
                let author = record
                    .author_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| self.default_author.clone());
                schema.insert("author".into(), json!({ "@type": "Person", "name": author }));
                schema.insert(
                    "publisher".into(),
                    json!({
                        "@type": "Organization",
                        "name": self.site_name,
                        "logo": {
                            "@type": "ImageObject",
                            "url": self.urls.absolute("logo.png"),
                        },
                    }),
                );
                insert_opt(&mut schema, "image", record.featured_image.clone());
                insert_opt(&mut schema, "articleSection", record.category.clone());
            }
            ContentType::Product => {
                insert_opt(&mut schema, "name", var("title"));
                insert_opt(&mut schema, "image", record.featured_image.clone());
                schema.insert(
                    "brand".into(),
                    json!({ "@type": "Brand", "name": self.site_name }),
                );
                if let Some(pricing) = &record.pricing {
                    schema.insert(
                        "offers".into(),
                        json!({
                            "@type": "Offer",
                            "price": pricing.amount,
                            "priceCurrency": pricing.currency,
                        }),
                    );
                }
            }
            ContentType::Docs | ContentType::Landing | ContentType::Page => {}
        }

        Value::Object(schema)
    }
}

fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        map.insert(key.to_string(), Value::String(value));
    }
}

fn iso_millis(date: &chrono::DateTime<chrono::Utc>) -> String {
    date.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Open Graph `og:type` for a content type.
pub fn og_type(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Blog | ContentType::Docs => "article",
        ContentType::Product => "product",
        ContentType::Landing | ContentType::Page => "website",
    }
}

/// Schema.org `@type` for a content type.
pub fn schema_type(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Blog => "BlogPosting",
        ContentType::Product => "Product",
        ContentType::Docs => "TechArticle",
        ContentType::Landing | ContentType::Page => "WebPage",
    }
}

fn robots(record: &ContentRecord) -> &'static str {
    if record.is_draft() || record.noindex {
        ROBOTS_NOINDEX
    } else {
        ROBOTS_INDEX
    }
}

/// Plain-text excerpt from a Markdown body: HTML tags and emphasis, heading
/// and link punctuation are dropped, then the first non-heading line is kept.
pub fn excerpt_from_body(body: &str) -> String {
    let line = body
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .unwrap_or_default();

    let mut text = String::with_capacity(line.len());
    let mut in_tag = false;
    for c in line.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            '#' | '*' | '_' | '[' | ']' | '(' | ')' => {}
            _ => text.push(c),
        }
    }

    truncate_for_language(&collapse_whitespace(&text), BODY_EXCERPT_MAX, "en")
}
