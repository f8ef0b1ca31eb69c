//! Frontmatter parsing for content files.
//!
//! This is a line-oriented `key: value` reader, not a YAML parser. It
//! understands quoted scalars, single-level `[a, b]` lists, `true`/`false`,
//! and dates for keys whose name mentions a date.

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{CoreError, Result};

/// Frontmatter delimiter line.
pub const DELIMITER: &str = "---";

/// A single frontmatter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FrontmatterValue {
    String(String),
    List(Vec<String>),
    Bool(bool),
    Date(DateTime<Utc>),
}

/// Parsed frontmatter key/value pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    entries: HashMap<String, FrontmatterValue>,
}

impl Frontmatter {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&FrontmatterValue> {
        self.entries.get(key)
    }

    /// First non-empty string value among `keys`.
    pub fn get_str(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| match self.entries.get(*key) {
            Some(FrontmatterValue::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        })
    }

    /// List value for `key`; a scalar string becomes a one-element list.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.entries.get(key) {
            Some(FrontmatterValue::List(items)) => items.clone(),
            Some(FrontmatterValue::String(s)) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.entries.get(key) {
            Some(FrontmatterValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// First date value among `keys`.
    pub fn get_date(&self, keys: &[&str]) -> Option<DateTime<Utc>> {
        keys.iter().find_map(|key| match self.entries.get(*key) {
            Some(FrontmatterValue::Date(date)) => Some(*date),
            Some(FrontmatterValue::String(s)) => parse_date(s),
            _ => None,
        })
    }

    fn insert(&mut self, key: String, value: FrontmatterValue) {
        self.entries.insert(key, value);
    }
}

/// Split content into the raw frontmatter block and the body.
///
/// Returns `Ok(None)` when the content does not open with a `---` line, and
/// an error when the opening delimiter is never closed.
pub fn split_frontmatter<'a>(content: &'a str, path: &Path) -> Result<Option<(&'a str, &'a str)>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(first_line_end) = content.find('\n') else {
        return Ok(None);
    };
    if content[..first_line_end].trim_end() != DELIMITER {
        return Ok(None);
    }

    let after_open = &content[first_line_end + 1..];
    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let block = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Ok(Some((block, body.trim())));
        }
        offset += line.len();
    }

    Err(CoreError::frontmatter(path, "unterminated frontmatter block"))
}

/// Parse frontmatter from a string, returning it together with the body.
///
/// Content without frontmatter yields an empty [`Frontmatter`] and the
/// trimmed content as body.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let Some((block, body)) = split_frontmatter(content, path)? else {
        return Ok((Frontmatter::default(), content.trim().to_string()));
    };

    Ok((parse_block(block), body.to_string()))
}

/// Parse the lines of a frontmatter block.
pub fn parse_block(block: &str) -> Frontmatter {
    let mut frontmatter = Frontmatter::default();

    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, raw)) = trimmed.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        frontmatter.insert(key.to_string(), parse_value(key, raw.trim()));
    }

    frontmatter
}

fn parse_value(key: &str, raw: &str) -> FrontmatterValue {
    let value = strip_quotes(raw);

    if value.starts_with('[') && value.ends_with(']') && value.len() >= 2 {
        let inner = &value[1..value.len() - 1];
        let items = inner
            .split(',')
            .map(|item| strip_quotes(item.trim()).to_string())
            .filter(|item| !item.is_empty())
            .collect();
        return FrontmatterValue::List(items);
    }

    match value {
        "true" => return FrontmatterValue::Bool(true),
        "false" => return FrontmatterValue::Bool(false),
        _ => {}
    }

    if is_date_key(key) {
        if let Some(date) = parse_date(value) {
            return FrontmatterValue::Date(date);
        }
    }

    FrontmatterValue::String(value.to_string())
}

/// Keys whose values are coerced to dates when they parse as one.
fn is_date_key(key: &str) -> bool {
    key.contains("date") || key.contains("Date") || key.contains("At")
}

fn strip_quotes(value: &str) -> &str {
    let value = value
        .strip_prefix('"')
        .or_else(|| value.strip_prefix('\''))
        .unwrap_or(value);
    value
        .strip_suffix('"')
        .or_else(|| value.strip_suffix('\''))
        .unwrap_or(value)
}

/// Parse RFC 3339, `YYYY-MM-DD`, or `YYYY-MM-DD HH:MM:SS` (taken as UTC).
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    fn path() -> &'static Path {
        Path::new("content/en/blog/post.md")
    }

    #[test]
    fn test_parse_basic_frontmatter() {
        let content = r#"---
title: "Hello World"
slug: 'blog/hello'
draft: false
tags: [rust, "web dev", seo]
---

# Hello

Body text."#;

        let (fm, body) = parse_frontmatter(content, path()).expect("parse");
        assert_eq!(fm.get_str(&["title"]), Some("Hello World"));
        assert_eq!(fm.get_str(&["slug"]), Some("blog/hello"));
        assert_eq!(fm.get_bool("draft"), Some(false));
        assert_eq!(fm.get_list("tags"), vec!["rust", "web dev", "seo"]);
        assert_eq!(body, "# Hello\n\nBody text.");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "  # Just a heading\n\nSome content.\n";
        let (fm, body) = parse_frontmatter(content, path()).expect("parse");
        assert!(fm.is_empty());
        assert_eq!(body, "# Just a heading\n\nSome content.");
    }

    #[test]
    fn test_unterminated_frontmatter_is_error() {
        let content = "---\ntitle: Oops\n\n# Body";
        let err = parse_frontmatter(content, path()).unwrap_err();
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_comments_and_invalid_lines_skipped() {
        let content = "---\n# a comment\nnot a pair\ntitle: Kept\n: empty key\n---\nbody";
        let (fm, _) = parse_frontmatter(content, path()).expect("parse");
        assert_eq!(fm.len(), 1);
        assert_eq!(fm.get_str(&["title"]), Some("Kept"));
    }

    #[test]
    fn test_value_with_colon() {
        let content = "---\nfeaturedImage: https://example.com/a.png\n---\n";
        let (fm, _) = parse_frontmatter(content, path()).expect("parse");
        assert_eq!(
            fm.get_str(&["featuredImage"]),
            Some("https://example.com/a.png")
        );
    }

    #[test]
    fn test_date_coercion_by_key() {
        let content = "---\ndate: 2025-01-15\npublishedAt: \"2025-01-15T10:30:00Z\"\nupdatedAt: 2025-02-01 08:00:00\nrelease: 2025-03-01\n---\n";
        let (fm, _) = parse_frontmatter(content, path()).expect("parse");

        assert!(matches!(fm.get("date"), Some(FrontmatterValue::Date(_))));
        let published = fm.get_date(&["publishedAt"]).expect("date");
        assert_eq!(published.hour(), 10);
        let updated = fm.get_date(&["updatedAt"]).expect("date");
        assert_eq!(updated.month(), 2);

        // Key does not mention a date, so the value stays a string.
        assert_eq!(
            fm.get("release"),
            Some(&FrontmatterValue::String("2025-03-01".to_string()))
        );
    }

    #[test]
    fn test_unparseable_date_stays_string() {
        let content = "---\ndate: someday\n---\n";
        let (fm, _) = parse_frontmatter(content, path()).expect("parse");
        assert_eq!(fm.get_str(&["date"]), Some("someday"));
        assert!(fm.get_date(&["date"]).is_none());
    }

    #[test]
    fn test_get_str_fallback_keys() {
        let content = "---\nlang: zh\n---\n";
        let (fm, _) = parse_frontmatter(content, path()).expect("parse");
        assert_eq!(fm.get_str(&["language", "lang"]), Some("zh"));
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2025-01-15").is_some());
        assert!(parse_date("2025-01-15T00:00:00+08:00").is_some());
        assert!(parse_date("2025-01-15 12:00:00").is_some());
        assert!(parse_date("15/01/2025").is_none());
    }
}
