//! SEO templates and variable substitution.
//!
//! Templates are plain strings with `{{ variable }}` placeholders, keyed by
//! content type with per-language overrides. Placeholders without a value are
//! dropped rather than treated as errors since templates are site content.

use std::{collections::HashMap, path::Path};

use serde::{Deserialize, Serialize};
use seokit_core::{
    ContentType, CoreError,
    text::{collapse_whitespace, is_cjk_language},
};

/// Template context with variables for interpolation.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Create context with initial variables.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Overlay every variable of `other` onto this context.
    pub fn extend(&mut self, other: &TemplateContext) {
        for (key, value) in &other.variables {
            self.variables.insert(key.clone(), value.clone());
        }
    }
}

/// Substitute `{{ key }}` placeholders from `context`.
///
/// Unknown placeholders are removed, an unclosed `{{` is kept literally, and
/// whitespace in the result is collapsed.
pub fn apply_template(template: &str, context: &TemplateContext) -> String {
    if template.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        match after_open.find("}}") {
            Some(end) if end > 0 && !after_open[..end].contains('}') => {
                let key = after_open[..end].trim();
                out.push_str(context.get(key).unwrap_or_default());
                rest = &after_open[end + 2..];
            }
            _ => {
                out.push_str("{{");
                rest = after_open;
            }
        }
    }
    out.push_str(rest);

    collapse_whitespace(&out)
}

/// Template strings for one content type. Unset fields fall back to the
/// title and description templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_description: Option<String>,
}

impl SeoTemplate {
    fn new(title: &str, description: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            ..Self::default()
        }
    }

    /// Shallow merge: fields set in `overrides` replace ours.
    #[must_use]
    pub fn merged(&self, overrides: &SeoTemplate) -> SeoTemplate {
        let pick = |over: &Option<String>, base: &Option<String>| over.clone().or_else(|| base.clone());
        SeoTemplate {
            title: pick(&overrides.title, &self.title),
            description: pick(&overrides.description, &self.description),
            og_title: pick(&overrides.og_title, &self.og_title),
            og_description: pick(&overrides.og_description, &self.og_description),
            twitter_title: pick(&overrides.twitter_title, &self.twitter_title),
            twitter_description: pick(&overrides.twitter_description, &self.twitter_description),
        }
    }
}

/// Character limits for the final title and description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub title_max: usize,
    pub description_max: usize,
}

impl Limits {
    /// Limits for a language: CJK text gets tighter budgets.
    pub fn for_language(language: &str) -> Self {
        if is_cjk_language(language) {
            Self {
                title_max: 30,
                description_max: 80,
            }
        } else {
            Self {
                title_max: 60,
                description_max: 160,
            }
        }
    }
}

/// A template after type and language resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub template: SeoTemplate,
    pub limits: Limits,
}

impl ResolvedTemplate {
    pub fn title(&self) -> &str {
        self.template.title.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.template.description.as_deref().unwrap_or_default()
    }

    pub fn og_title(&self) -> &str {
        self.template.og_title.as_deref().unwrap_or_else(|| self.title())
    }

    pub fn og_description(&self) -> &str {
        self.template
            .og_description
            .as_deref()
            .unwrap_or_else(|| self.description())
    }

    pub fn twitter_title(&self) -> &str {
        self.template
            .twitter_title
            .as_deref()
            .unwrap_or_else(|| self.title())
    }

    pub fn twitter_description(&self) -> &str {
        self.template
            .twitter_description
            .as_deref()
            .unwrap_or_else(|| self.description())
    }
}

/// The full template set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoTemplates {
    /// Fallback for content types without their own template.
    #[serde(default = "default_template")]
    pub default: SeoTemplate,

    /// Language code to (content type or `default`) to overrides.
    #[serde(default)]
    pub language_overrides: HashMap<String, HashMap<String, SeoTemplate>>,

    /// Content type name to template.
    #[serde(flatten)]
    pub types: HashMap<String, SeoTemplate>,
}

fn default_template() -> SeoTemplate {
    SeoTemplate::new("{{title}} | {{siteName}}", "{{excerpt}}")
}

impl Default for SeoTemplates {
    fn default() -> Self {
        let mut types = HashMap::new();
        types.insert(
            "blog".to_string(),
            SeoTemplate {
                og_title: Some("{{title}}".to_string()),
                twitter_title: Some("{{title}}".to_string()),
                ..SeoTemplate::new("{{title}} | {{siteName}}", "{{excerpt}}")
            },
        );
        types.insert(
            "product".to_string(),
            SeoTemplate::new("{{title}} - {{siteName}}", "{{excerpt}}"),
        );
        types.insert(
            "docs".to_string(),
            SeoTemplate::new("{{title}} - {{siteName}} Docs", "{{excerpt}}"),
        );
        types.insert(
            "landing".to_string(),
            SeoTemplate::new("{{siteName}} | {{title}}", "{{excerpt}}"),
        );

        let mut zh = HashMap::new();
        zh.insert(
            "docs".to_string(),
            SeoTemplate {
                title: Some("{{title}} - {{siteName}} 文档".to_string()),
                ..SeoTemplate::default()
            },
        );
        let mut ja = HashMap::new();
        ja.insert(
            "docs".to_string(),
            SeoTemplate {
                title: Some("{{title}} - {{siteName}} ドキュメント".to_string()),
                ..SeoTemplate::default()
            },
        );
        let mut language_overrides = HashMap::new();
        language_overrides.insert("zh".to_string(), zh);
        language_overrides.insert("ja".to_string(), ja);

        Self {
            default: default_template(),
            language_overrides,
            types,
        }
    }
}

impl SeoTemplates {
    /// Load templates from a JSON file.
    pub fn load(path: &Path) -> seokit_core::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let templates: SeoTemplates = serde_json::from_str(&content)
            .map_err(|e| CoreError::data_file(path, e.to_string()))?;
        tracing::debug!(path = %path.display(), types = templates.types.len(), "loaded SEO templates");
        Ok(templates)
    }

    /// Load the file at `path`, or the built-in templates.
    pub fn load_or_default(path: Option<&Path>) -> seokit_core::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Resolve the template for a content type in a language.
    ///
    /// The type template (else `default`) is shallow-merged with the language
    /// override for the type (else the language's `default` override).
    pub fn resolve(&self, content_type: ContentType, language: &str) -> ResolvedTemplate {
        let base = self
            .types
            .get(content_type.as_str())
            .unwrap_or(&self.default);

        let overrides = self.language_overrides.get(language).and_then(|by_type| {
            by_type
                .get(content_type.as_str())
                .or_else(|| by_type.get("default"))
        });

        let template = match overrides {
            Some(overrides) => base.merged(overrides),
            None => base.clone(),
        };

        ResolvedTemplate {
            template,
            limits: Limits::for_language(language),
        }
    }
}
