//! Sitemap generation with metrics.
//!
//! Metrics are emitted as `tracing` events on the [`METRICS_TARGET`] target so
//! a subscriber layer can forward them to a monitoring backend.

use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::sitemap::{Result, SitemapGenerator, SitemapRun};

/// Tracing target for metric events.
pub const METRICS_TARGET: &str = "seokit::metrics";

/// Wraps a [`SitemapGenerator`] and reports success, duration and file count,
/// or an error count. The run result is returned unchanged.
#[derive(Debug)]
pub struct MonitoredSitemapGenerator {
    inner: SitemapGenerator,
}

impl MonitoredSitemapGenerator {
    pub fn new(inner: SitemapGenerator) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &SitemapGenerator {
        &self.inner
    }

    pub async fn generate_all(&self) -> Result<SitemapRun> {
        let start = Instant::now();

        match self.inner.generate_all().await {
            Ok(run) => {
                for (metric, value) in success_metrics(&run, start.elapsed()) {
                    info!(target: METRICS_TARGET, metric, value, "metric");
                }
                Ok(run)
            }
            Err(e) => {
                error!(target: METRICS_TARGET, metric = "sitemap.generation.error", value = 1u64, "metric");
                error!(error = %e, "sitemap.generation.failed");
                Err(e)
            }
        }
    }
}

/// Metric name/value pairs for a successful run. Duration is in milliseconds.
pub fn success_metrics(run: &SitemapRun, elapsed: Duration) -> [(&'static str, u64); 3] {
    [
        ("sitemap.generation.success", 1),
        (
            "sitemap.generation.duration",
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        ),
        ("sitemap.files.count", run.sitemaps.len() as u64),
    ]
}

#[cfg(test)]
mod tests {
    use std::{path::PathBuf, sync::Arc};

    use seokit_core::{Config, LanguageMapper};

    use super::*;
    use crate::{sitemap::SitemapFile, source::MockContentSource};

    #[test]
    fn test_success_metrics() {
        let run = SitemapRun {
            success: true,
            sitemaps: vec![SitemapFile {
                language: "en".to_string(),
                path: PathBuf::from("sitemap-en.xml"),
                url: "https://seasalt.ai/sitemaps/sitemap-en.xml".to_string(),
                lastmod: "2025-01-15T00:00:00.000Z".to_string(),
            }],
            index: Some(PathBuf::from("sitemap.xml")),
        };

        let metrics = success_metrics(&run, Duration::from_millis(42));
        assert_eq!(
            metrics,
            [
                ("sitemap.generation.success", 1),
                ("sitemap.generation.duration", 42),
                ("sitemap.files.count", 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_result_passed_through() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let inner = SitemapGenerator::new(
            &Config::default(),
            Arc::new(MockContentSource::new()),
            Arc::new(LanguageMapper::builtin()),
        )
        .with_output_dir(dir.path());

        let run = MonitoredSitemapGenerator::new(inner)
            .generate_all()
            .await
            .expect("generate");
        assert!(run.success);
        assert_eq!(run.sitemaps.len(), 2);
    }

    #[tokio::test]
    async fn test_error_passed_through() {
        let dir = tempfile::tempdir().expect("create temp dir");
        // A regular file where the output directory should be.
        let blocker = dir.path().join("public");
        std::fs::write(&blocker, "").expect("write");

        let inner = SitemapGenerator::new(
            &Config::default(),
            Arc::new(MockContentSource::new()),
            Arc::new(LanguageMapper::builtin()),
        )
        .with_output_dir(&blocker);

        let err = MonitoredSitemapGenerator::new(inner)
            .generate_all()
            .await
            .unwrap_err();
        assert!(matches!(err, crate::sitemap::SitemapError::Io { .. }));
    }
}
