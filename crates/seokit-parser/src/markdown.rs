//! Markdown content parser using pulldown-cmark.
//!
//! Turns a Markdown file with optional frontmatter into a [`ContentRecord`],
//! deriving every field the frontmatter leaves out from the file path, the
//! body, and the file metadata.

use std::{
    collections::BTreeMap,
    fs,
    ops::Range,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use chrono::{DateTime, Utc};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use rayon::prelude::*;
use regex::Regex;
use seokit_core::{
    content::{AlternateLanguage, Author, ContentRecord, ContentType, ImageRef, Pricing, Status},
    frontmatter::{Frontmatter, parse_frontmatter},
    text::{collapse_whitespace, truncate_at_word_boundary},
};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Maximum excerpt length in characters.
pub const EXCERPT_MAX_CHARS: usize = 160;

/// Title used when neither frontmatter nor body provide one.
pub const UNTITLED: &str = "Untitled";

const DEFAULT_CURRENCY: &str = "USD";

/// A language directory name such as `en` or `zh-tw`.
static LANGUAGE_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z]{2}(-[a-z]{2})?$").expect("valid language regex"));

/// A language suffix before the extension, as in `post.zh.md`.
static LANGUAGE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.([a-z]{2})\.mdx?$").expect("valid suffix regex"));

/// Markdown parsing errors.
#[derive(Debug, Error)]
pub enum MarkdownError {
    /// Failed to read the file or its metadata.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse frontmatter.
    #[error("frontmatter error: {0}")]
    Frontmatter(#[from] seokit_core::error::CoreError),
}

/// Result type for markdown operations.
pub type Result<T> = std::result::Result<T, MarkdownError>;

/// Parser settings.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Content root; paths are derived relative to it.
    pub base_dir: PathBuf,

    /// Language for files with no language in their path.
    pub default_language: String,

    /// Author for files whose frontmatter names none.
    pub default_author: Option<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("content"),
            default_language: "en".to_string(),
            default_author: None,
        }
    }
}

/// File timestamps used when frontmatter carries no dates.
#[derive(Debug, Clone, Copy)]
pub struct FileTimes {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl FileTimes {
    fn from_metadata(metadata: &fs::Metadata) -> std::io::Result<Self> {
        let modified = metadata.modified()?;
        let created = metadata.created().unwrap_or(modified);
        Ok(Self {
            created: created.into(),
            modified: modified.into(),
        })
    }
}

/// Markdown parser producing content records.
#[derive(Debug, Clone)]
pub struct MarkdownParser {
    config: ParserConfig,
    options: Options,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl MarkdownParser {
    /// Create a new markdown parser.
    pub fn new(config: ParserConfig) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        Self { config, options }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a single Markdown file.
    pub fn parse_file(&self, path: &Path) -> Result<ContentRecord> {
        debug!(path = %path.display(), "parsing file");

        let io_err = |source| MarkdownError::Io {
            path: path.to_path_buf(),
            source,
        };
        let content = fs::read_to_string(path).map_err(io_err)?;
        let metadata = fs::metadata(path).map_err(io_err)?;
        let times = FileTimes::from_metadata(&metadata).map_err(io_err)?;

        let (fm, body) = parse_frontmatter(&content, path)?;
        let discover = fm.get(ALTERNATES_KEY).is_none();
        let mut record = self.build_record(&fm, body, path, times);
        if discover {
            record.alternate_languages = self.find_alternate_languages(path);
        }
        Ok(record)
    }

    /// Parse Markdown source as if it were read from `path`.
    ///
    /// Alternates come only from an `alternateLanguages` frontmatter list;
    /// discovery on disk happens in [`parse_file`](Self::parse_file).
    pub fn parse_content(
        &self,
        content: &str,
        path: &Path,
        times: FileTimes,
    ) -> Result<ContentRecord> {
        let (fm, body) = parse_frontmatter(content, path)?;
        Ok(self.build_record(&fm, body, path, times))
    }

    fn build_record(&self, fm: &Frontmatter, body: String, path: &Path, times: FileTimes) -> ContentRecord {
        let summary = summarize(&body, self.options);

        let content_type = fm
            .get_str(&["contentType", "type"])
            .map(ContentType::from_str_lossy)
            .unwrap_or_else(|| ContentType::from_path(&self.relative_path(path)));

        let author = fm
            .get_str(&["author"])
            .map(str::to_string)
            .or_else(|| self.config.default_author.clone())
            .map(Author::new);

        let pricing = fm.get_str(&["price"]).map(|amount| Pricing {
            amount: amount.to_string(),
            currency: fm
                .get_str(&["currency"])
                .unwrap_or(DEFAULT_CURRENCY)
                .to_string(),
        });

        let slug = fm
            .get_str(&["slug"])
            .map_or_else(|| self.generate_slug(path), str::to_string);
        let alternate_languages = declared_alternates(fm, &slug);

        ContentRecord {
            id: fm
                .get_str(&["id"])
                .map_or_else(|| generate_id(path), str::to_string),
            slug,
            language: fm
                .get_str(&["language", "lang"])
                .map_or_else(|| self.detect_language(path), str::to_lowercase),
            content_type,
            title: fm
                .get_str(&["title"])
                .map(str::to_string)
                .or(summary.title)
                .unwrap_or_else(|| UNTITLED.to_string()),
            excerpt: fm
                .get_str(&["excerpt", "description"])
                .map(str::to_string)
                .or(summary.excerpt)
                .unwrap_or_default(),
            category: fm.get_str(&["category"]).map(str::to_string),
            tags: fm.get_list("tags"),
            author,
            featured_image: fm
                .get_str(&["featuredImage", "image"])
                .map(str::to_string),
            published_at: fm
                .get_date(&["publishedAt", "date"])
                .unwrap_or(times.created),
            updated_at: fm.get_date(&["updatedAt"]).unwrap_or(times.modified),
            status: status_of(fm),
            alternate_languages,
            images: summary.images,
            pricing,
            noindex: fm.get_bool("noindex").unwrap_or(false),
            body,
        }
    }

    /// Parse every Markdown file under `root`.
    ///
    /// Files are visited depth-first in file-name order. Files that fail to
    /// parse are logged and skipped. A missing root yields no records.
    pub fn parse_directory(&self, root: &Path) -> Vec<ContentRecord> {
        if !root.exists() {
            warn!(dir = %root.display(), "content directory does not exist");
            return Vec::new();
        }

        let files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "failed to read directory entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_markdown_file(entry.path()))
            .map(|entry| entry.into_path())
            .collect();

        info!(dir = %root.display(), count = files.len(), "found markdown files");

        let results: Vec<(PathBuf, Result<ContentRecord>)> = files
            .into_par_iter()
            .map(|path| {
                let result = self.parse_file(&path);
                (path, result)
            })
            .collect();

        results
            .into_iter()
            .filter_map(|(path, result)| match result {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to parse file");
                    None
                }
            })
            .collect()
    }

    /// Path relative to the content root, with `/` separators.
    fn relative_path(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.config.base_dir).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Derive a URL slug from the file path.
    pub fn generate_slug(&self, path: &Path) -> String {
        let relative = self.relative_path(path);

        let without_lang_dir = match relative.split_once('/') {
            Some((first, rest)) if LANGUAGE_SEGMENT.is_match(first) => rest,
            _ => relative.as_str(),
        };

        let without_ext = strip_markdown_extension(without_lang_dir);
        let without_suffix = strip_language_suffix(without_ext);

        slugify_path(without_suffix)
    }

    /// Detect the language from the path, falling back to the default.
    pub fn detect_language(&self, path: &Path) -> String {
        let relative = self.relative_path(path);

        if let Some(first) = relative.split('/').next()
            && relative.contains('/')
            && LANGUAGE_SEGMENT.is_match(first)
        {
            return first.to_lowercase();
        }

        let file_name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        if let Some(caps) = LANGUAGE_SUFFIX.captures(&file_name) {
            return caps[1].to_lowercase();
        }

        self.config.default_language.clone()
    }

    /// Find translations of `path` on disk.
    ///
    /// Looks in sibling language directories for the same relative file and
    /// in the same directory for `name.xx.md` variants.
    pub fn find_alternate_languages(&self, path: &Path) -> Vec<AlternateLanguage> {
        let current = self.detect_language(path);
        let mut found: BTreeMap<String, String> = BTreeMap::new();

        let relative = self.relative_path(path);
        if let Some((first, rest)) = relative.split_once('/')
            && LANGUAGE_SEGMENT.is_match(first)
        {
            for (lang, dir) in self.language_dirs() {
                if lang == current || found.contains_key(&lang) {
                    continue;
                }
                let candidate = dir.join(rest);
                if candidate.is_file() {
                    found.insert(lang, self.generate_slug(&candidate));
                }
            }
        }

        if let (Some(parent), Some(stem)) = (path.parent(), translation_stem(path))
            && let Ok(entries) = fs::read_dir(parent)
        {
            for entry in entries.flatten() {
                let candidate = entry.path();
                if candidate == path
                    || !candidate.is_file()
                    || !is_markdown_file(&candidate)
                    || translation_stem(&candidate).as_deref() != Some(stem.as_str())
                {
                    continue;
                }
                let lang = self.detect_language(&candidate);
                if lang != current && !found.contains_key(&lang) {
                    found.insert(lang, self.generate_slug(&candidate));
                }
            }
        }

        found
            .into_iter()
            .map(|(language, slug)| AlternateLanguage { language, slug })
            .collect()
    }

    /// Language-named directories directly under the content root.
    fn language_dirs(&self) -> Vec<(String, PathBuf)> {
        let Ok(entries) = fs::read_dir(&self.config.base_dir) else {
            return Vec::new();
        };

        entries
            .flatten()
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                LANGUAGE_SEGMENT
                    .is_match(&name)
                    .then(|| (name.to_lowercase(), entry.path()))
            })
            .collect()
    }
}

/// Body-derived fields.
#[derive(Debug, Default)]
struct Summary {
    title: Option<String>,
    excerpt: Option<String>,
    images: Vec<ImageRef>,
}

/// Walk the Markdown events once, collecting the first `#` heading, the first
/// prose paragraph and every image.
///
/// Setext headings (`Title` underlined with `===`) are not titles.
fn summarize(body: &str, options: Options) -> Summary {
    let mut summary = Summary::default();

    let mut heading: Option<String> = None;
    let mut paragraph: Option<String> = None;
    let mut image: Option<(String, String)> = None;

    for (event, range) in Parser::new_ext(body, options).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) if summary.title.is_none() && is_atx_heading(body, range) => {
                heading = Some(String::new());
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                if let Some(text) = heading.take() {
                    let text = collapse_whitespace(&text);
                    if !text.is_empty() {
                        summary.title = Some(text);
                    }
                }
            }
            Event::Start(Tag::Paragraph) if summary.excerpt.is_none() => {
                paragraph = Some(String::new());
            }
            Event::End(TagEnd::Paragraph) => {
                if let Some(text) = paragraph.take() {
                    let text = collapse_whitespace(&text);
                    if !text.is_empty() {
                        summary.excerpt = Some(truncate_at_word_boundary(&text, EXCERPT_MAX_CHARS));
                    }
                }
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                image = Some((dest_url.to_string(), String::new()));
            }
            Event::End(TagEnd::Image) => {
                if let Some((url, alt)) = image.take() {
                    summary.images.push(ImageRef {
                        url,
                        title: alt.clone(),
                        caption: alt,
                    });
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, alt)) = image.as_mut() {
                    alt.push_str(&text);
                } else if let Some(h) = heading.as_mut() {
                    h.push_str(&text);
                } else if let Some(p) = paragraph.as_mut() {
                    p.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(p) = paragraph.as_mut() {
                    p.push(' ');
                }
            }
            _ => {}
        }
    }

    summary
}

fn is_atx_heading(body: &str, range: Range<usize>) -> bool {
    body.get(range)
        .is_some_and(|source| source.trim_start().starts_with('#'))
}

/// Frontmatter key listing translations as `lang:slug` entries.
const ALTERNATES_KEY: &str = "alternateLanguages";

/// Alternates declared in frontmatter.
///
/// Each entry is `lang:slug`; a bare `lang` means the translation shares
/// `own_slug`.
fn declared_alternates(fm: &Frontmatter, own_slug: &str) -> Vec<AlternateLanguage> {
    fm.get_list(ALTERNATES_KEY)
        .iter()
        .filter_map(|entry| {
            let (language, slug) = match entry.split_once(':') {
                Some((language, slug)) => (language.trim(), slug.trim().trim_matches('/')),
                None => (entry.trim(), own_slug),
            };
            (!language.is_empty() && !slug.is_empty())
                .then(|| AlternateLanguage::new(language.to_lowercase(), slug))
        })
        .collect()
}

fn status_of(fm: &Frontmatter) -> Status {
    let draft_status = fm
        .get_str(&["status"])
        .is_some_and(|s| s.eq_ignore_ascii_case("draft"));
    if draft_status || fm.get_bool("draft") == Some(true) {
        Status::Draft
    } else {
        Status::Published
    }
}

/// First 12 hex characters of the SHA-256 of the path.
pub fn generate_id(path: &Path) -> String {
    let digest = Sha256::digest(path.to_string_lossy().as_bytes());
    let mut hex = format!("{digest:x}");
    hex.truncate(12);
    hex
}

fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("mdx"))
}

fn strip_markdown_extension(path: &str) -> &str {
    for ext in [".mdx", ".md", ".MDX", ".MD"] {
        if let Some(stripped) = path.strip_suffix(ext) {
            return stripped;
        }
    }
    path
}

/// Strip a trailing `.xx` or `.xx-yy` language suffix.
fn strip_language_suffix(path: &str) -> &str {
    match path.rsplit_once('.') {
        Some((head, tail)) if !tail.contains('/') && LANGUAGE_SEGMENT.is_match(tail) => head,
        _ => path,
    }
}

/// File stem with any language suffix removed, used to pair translations.
fn translation_stem(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let stem = strip_markdown_extension(name);
    Some(strip_language_suffix(stem).to_lowercase())
}

/// Lowercase, replace runs of characters outside `[a-z0-9/-]` with `-`,
/// and trim hyphens from both ends.
fn slugify_path(path: &str) -> String {
    let mut slug = String::with_capacity(path.len());
    let mut pending_hyphen = false;

    for c in path.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '/' {
            if pending_hyphen {
                slug.push('-');
                pending_hyphen = false;
            }
            slug.push(c);
        } else {
            pending_hyphen = !slug.is_empty();
        }
    }

    slug
}
