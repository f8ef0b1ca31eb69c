//! Generate command - writes per-language sitemaps and the sitemap index

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use color_eyre::eyre::{Result, WrapErr};
use seokit_generator::{MonitoredSitemapGenerator, SitemapGenerator, SitemapRun};

use super::{SourceKind, content_source, load_config, load_languages};

/// Options for the generate command.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub output: Option<PathBuf>,
    pub source: SourceKind,
    pub content: Option<PathBuf>,
    pub monitored: bool,
}

/// Run the generate command.
pub async fn run(config_path: &Path, options: &GenerateOptions) -> Result<SitemapRun> {
    let start = Instant::now();
    tracing::info!(?config_path, ?options, "Starting sitemap generation");

    let config = load_config(config_path, options.content.as_deref())?;
    let languages = load_languages(&config)?;
    let source = content_source(options.source, &config);

    let mut generator = SitemapGenerator::new(&config, source, languages);
    if let Some(output) = &options.output {
        generator = generator.with_output_dir(output);
    }
    let output_dir = generator.output_dir().to_path_buf();

    let run = if options.monitored {
        MonitoredSitemapGenerator::new(generator).generate_all().await
    } else {
        generator.generate_all().await
    }
    .wrap_err("Sitemap generation failed")?;

    print_summary(&run, &output_dir, start.elapsed().as_secs_f64());
    Ok(run)
}

fn print_summary(run: &SitemapRun, output_dir: &Path, secs: f64) {
    println!();
    if run.sitemaps.is_empty() {
        println!("  No published content; nothing written.");
        println!();
        return;
    }

    println!("  Generated {} sitemap file(s):", run.sitemaps.len());
    for sitemap in &run.sitemaps {
        println!("    - [{}] {}", sitemap.language, sitemap.url);
    }
    println!();
    if let Some(index) = &run.index {
        println!("  Index:      {}", index.display());
    }
    println!("  Output:     {}", output_dir.display());
    println!("  Duration:   {secs:.2}s");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_from_mock() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let options = GenerateOptions {
            output: Some(dir.path().join("public")),
            source: SourceKind::Mock,
            content: None,
            monitored: true,
        };

        let run = run(&dir.path().join("config.toml"), &options)
            .await
            .expect("generate");
        assert_eq!(run.sitemaps.len(), 2);
        assert!(dir.path().join("public/sitemap.xml").exists());
        assert!(dir.path().join("public/sitemaps/sitemap-zh.xml").exists());
    }

    #[tokio::test]
    async fn test_generate_from_git_writes_nothing() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let options = GenerateOptions {
            output: Some(dir.path().join("public")),
            source: SourceKind::Git,
            content: None,
            monitored: false,
        };

        let run = run(&dir.path().join("config.toml"), &options)
            .await
            .expect("generate");
        assert!(run.success);
        assert!(run.index.is_none());
    }
}
