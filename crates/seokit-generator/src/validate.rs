//! SEO checks over generated meta tags.

use serde::Serialize;
use seokit_core::ContentRecord;
use tracing::debug;

use crate::{
    meta::{MetaTagEngine, MetaTags},
    source::{ContentSource, Result},
    template::TemplateContext,
};

/// Title length above which a warning is reported.
pub const TITLE_WARN_CHARS: usize = 60;
/// Description length above which a warning is reported.
pub const DESCRIPTION_WARN_CHARS: usize = 160;

/// Findings from a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Number of records checked.
    pub checked: usize,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Regenerates meta tags for content and reports problems.
#[derive(Debug, Clone)]
pub struct SeoValidator {
    engine: MetaTagEngine,
}

impl SeoValidator {
    pub fn new(engine: MetaTagEngine) -> Self {
        Self { engine }
    }

    /// Validate every published record of `source`.
    pub async fn validate_source(&self, source: &dyn ContentSource) -> Result<ValidationReport> {
        let records = source.all_published().await?;
        Ok(self.validate(&records))
    }

    /// Validate the given records.
    pub fn validate(&self, records: &[ContentRecord]) -> ValidationReport {
        let mut report = ValidationReport::default();
        let context = TemplateContext::new();

        for record in records {
            debug!(slug = %record.slug, language = %record.language, "checking");
            let meta = self.engine.generate(record, &context);
            check(record, &meta, &mut report);
            report.checked += 1;
        }

        report
    }
}

fn check(record: &ContentRecord, meta: &MetaTags, report: &mut ValidationReport) {
    let label = format!("{} ({})", record.slug, record.language);

    let title_len = meta.title.chars().count();
    if meta.title.is_empty() {
        report.errors.push(format!("{label}: missing title"));
    } else if title_len > TITLE_WARN_CHARS {
        report
            .warnings
            .push(format!("{label}: title too long ({title_len} chars)"));
    }

    let description_len = meta.description.chars().count();
    if meta.description.is_empty() {
        report.errors.push(format!("{label}: missing description"));
    } else if description_len > DESCRIPTION_WARN_CHARS {
        report
            .warnings
            .push(format!("{label}: description too long ({description_len} chars)"));
    }

    if meta.canonical.is_empty() {
        report.errors.push(format!("{label}: missing canonical URL"));
    }

    if meta.hreflang.is_empty() {
        report.warnings.push(format!("{label}: no hreflang tags"));
    }

    if meta.open_graph.title.is_empty() {
        report.warnings.push(format!("{label}: missing OG title"));
    }
    if meta.open_graph.image.is_empty() {
        report.warnings.push(format!("{label}: missing OG image"));
    }

    let schema_empty = meta
        .schema
        .as_object()
        .is_none_or(|fields| fields.is_empty());
    if schema_empty {
        report.warnings.push(format!("{label}: missing structured data"));
    }
}
