//! seokit generator library
//!
//! Builds SEO artifacts from content records.
//!
//! # Modules
//!
//! - [`source`] - Content sources (mock, Markdown directory, git)
//! - [`template`] - SEO templates with variable interpolation
//! - [`links`] - Canonical URLs and hreflang sets
//! - [`meta`] - Meta tags, Open Graph, Twitter cards and JSON-LD
//! - [`head`] - `<head>` HTML rendering
//! - [`sitemap`] - Per-language XML sitemaps and the sitemap index
//! - [`notify`] - Search engine notification
//! - [`monitored`] - Sitemap generation with metrics
//! - [`validate`] - SEO checks over generated meta tags

pub mod head;
pub mod links;
pub mod meta;
pub mod monitored;
pub mod notify;
pub mod sitemap;
pub mod source;
pub mod template;
pub mod validate;

pub use head::render_head;
pub use links::{HreflangLink, UrlBuilder};
pub use meta::{MetaTagEngine, MetaTags, OpenGraph, TwitterCard};
pub use monitored::MonitoredSitemapGenerator;
pub use notify::{LogNotifier, NotifyError, SitemapNotifier};
pub use sitemap::{SitemapError, SitemapFile, SitemapGenerator, SitemapRun};
pub use source::{
    ContentSource, GitContentSource, MarkdownContentSource, MockContentSource, SourceError,
};
pub use template::{SeoTemplates, TemplateContext};
pub use validate::{SeoValidator, ValidationReport};
