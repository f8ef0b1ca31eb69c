//! CLI command implementations.

pub mod generate;
pub mod inspect;
pub mod validate;

use std::{path::Path, sync::Arc};

use clap::ValueEnum;
use color_eyre::eyre::{Result, WrapErr};
use seokit_core::{Config, LanguageMapper};
use seokit_generator::{
    ContentSource, GitContentSource, MarkdownContentSource, MockContentSource, MetaTagEngine,
    source::{SystemClock, markdown::DEFAULT_TTL},
};
use seokit_parser::{MarkdownParser, ParserConfig};

/// Where content comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Built-in three-record fixture.
    #[default]
    Mock,
    /// Markdown files under the content directory.
    Markdown,
    /// Git-backed content (not fetched yet).
    Git,
}

/// Load the configuration, applying `SEOKIT__*` overrides and the
/// `--content` flag.
pub fn load_config(path: &Path, content: Option<&Path>) -> Result<Config> {
    let mut config = Config::load_with_env(path)
        .wrap_err_with(|| format!("Failed to load configuration from {}", path.display()))?;

    if let Some(dir) = content {
        config.content.dir = dir.to_path_buf();
    }

    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Load the language table named in the config, or the built-in one.
pub fn load_languages(config: &Config) -> Result<Arc<LanguageMapper>> {
    let mapper = LanguageMapper::load_or_builtin(config.seo.languages_file.as_deref())
        .wrap_err("Failed to load language table")?;
    Ok(Arc::new(mapper))
}

/// Build the meta tag engine for the config.
pub fn meta_engine(config: &Config, languages: Arc<LanguageMapper>) -> Result<MetaTagEngine> {
    MetaTagEngine::from_config(config, languages).wrap_err("Failed to load SEO templates")
}

/// Markdown parser rooted at the configured content directory.
pub fn markdown_parser(config: &Config) -> MarkdownParser {
    MarkdownParser::new(ParserConfig {
        base_dir: config.content.dir.clone(),
        default_language: config.site.default_language.clone(),
        default_author: Some(config.site.default_author()),
    })
}

/// Construct the content source selected on the command line.
pub fn content_source(kind: SourceKind, config: &Config) -> Arc<dyn ContentSource> {
    match kind {
        SourceKind::Mock => Arc::new(MockContentSource::new()),
        SourceKind::Markdown => {
            let ttl = i64::try_from(config.content.cache_ttl_secs)
                .ok()
                .and_then(chrono::Duration::try_seconds)
                .unwrap_or(DEFAULT_TTL);
            Arc::new(MarkdownContentSource::with_cache(
                markdown_parser(config),
                config.content.dir.clone(),
                ttl,
                Arc::new(SystemClock),
            ))
        }
        SourceKind::Git => Arc::new(GitContentSource::new(config.content.dir.clone())),
    }
}
