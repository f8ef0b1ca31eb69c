//! Inspect command - shows derived fields and SEO for Markdown content

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use serde::Serialize;
use seokit_core::ContentRecord;
use seokit_generator::{MetaTagEngine, MetaTags, TemplateContext};

use super::{load_config, load_languages, markdown_parser, meta_engine};

/// Run the inspect command.
///
/// Parses every Markdown file (drafts included) and prints what was derived
/// for it together with its generated meta tags.
pub async fn run(config_path: &Path, content: Option<PathBuf>, json: bool) -> Result<()> {
    let config = load_config(config_path, content.as_deref())?;
    let engine = meta_engine(&config, load_languages(&config)?)?;
    let parser = markdown_parser(&config);
    let dir = config.content.dir.clone();

    tracing::info!(dir = %dir.display(), "Inspecting content");
    let records = tokio::task::spawn_blocking(move || parser.parse_directory(&dir))
        .await
        .wrap_err("Content parsing task failed")?;

    if json {
        println!("{}", to_json(&engine, &records)?);
    } else {
        print_records(&engine, &records);
    }

    Ok(())
}

/// One record with its generated meta tags.
#[derive(Debug, Serialize)]
struct Inspection<'a> {
    record: &'a ContentRecord,
    meta: MetaTags,
}

fn to_json(engine: &MetaTagEngine, records: &[ContentRecord]) -> Result<String> {
    let context = TemplateContext::new();
    let entries: Vec<Inspection<'_>> = records
        .iter()
        .map(|record| Inspection {
            record,
            meta: engine.generate(record, &context),
        })
        .collect();
    serde_json::to_string_pretty(&entries).wrap_err("Failed to serialize inspection output")
}

fn print_records(engine: &MetaTagEngine, records: &[ContentRecord]) {
    println!("Found {} content file(s)", records.len());
    let context = TemplateContext::new();

    for record in records {
        println!();
        println!("{}", "─".repeat(60));
        println!("  Slug:         {}", record.slug);
        println!("  ID:           {}", record.id);
        println!("  Language:     {}", record.language);
        println!("  Content type: {}", record.content_type);
        println!("  Title:        {}", record.title);
        println!("  Excerpt:      {}", record.excerpt);
        println!("  Author:       {}", record.author_name().unwrap_or("None"));
        println!("  Category:     {}", record.category.as_deref().unwrap_or("None"));
        println!("  Tags:         {}", join_or_none(&record.tags));
        println!("  Alternates:   {}", record.alternate_languages.len());
        println!("  Images:       {}", record.images.len());
        println!("  Status:       {}", record.status.as_str());
        println!("  Published:    {}", record.published_at.format("%Y-%m-%d"));
        println!("  Updated:      {}", record.updated_at.format("%Y-%m-%d"));

        print_meta(&engine.generate(record, &context));
    }
}

fn print_meta(meta: &MetaTags) {
    println!();
    println!("  SEO title:    {}", meta.title);
    println!("  Description:  {}", meta.description);
    println!("  Canonical:    {}", meta.canonical);
    println!("  Robots:       {}", meta.robots);
    println!("  Hreflang ({}):", meta.hreflang.len());
    for link in &meta.hreflang {
        println!("    - {}: {}", link.lang, link.url);
    }
    println!("  OG type:      {}", meta.open_graph.og_type);
    println!("  OG image:     {}", meta.open_graph.image);
    println!("  Schema type:  {}", meta.schema["@type"].as_str().unwrap_or("None"));
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}
