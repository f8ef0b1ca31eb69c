//! Validate command - checks generated SEO for all published content

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr, bail};
use seokit_generator::{SeoValidator, ValidationReport};

use super::{SourceKind, content_source, load_config, load_languages, meta_engine};

/// Run the validate command.
///
/// Fails when any error is found, or any warning in strict mode.
pub async fn run(
    config_path: &Path,
    source: SourceKind,
    content: Option<PathBuf>,
    strict: bool,
) -> Result<ValidationReport> {
    tracing::info!(?config_path, ?source, strict, "Validating SEO");

    let config = load_config(config_path, content.as_deref())?;
    let languages = load_languages(&config)?;
    let validator = SeoValidator::new(meta_engine(&config, languages)?);
    let source = content_source(source, &config);

    println!("Validating content from the {} source...", source.name());
    let report = validator
        .validate_source(source.as_ref())
        .await
        .wrap_err("Failed to load content")?;

    print_report(&report);

    if report.has_errors() {
        bail!("Validation failed with {} error(s)", report.errors.len());
    }

    if strict && !report.warnings.is_empty() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            report.warnings.len()
        );
    }

    Ok(report)
}

fn print_report(report: &ValidationReport) {
    println!();
    println!("Summary:");
    println!("  Checked:  {}", report.checked);
    println!("  Errors:   {}", report.errors.len());
    println!("  Warnings: {}", report.warnings.len());

    if !report.errors.is_empty() {
        println!();
        println!("Errors:");
        for err in &report.errors {
            println!("  ✗ {err}");
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warn in &report.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if report.is_clean() {
        println!();
        println!("✓ All SEO checks passed");
    }
}
