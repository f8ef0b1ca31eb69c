//! Search engine notification after sitemap generation.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use url::{Url, form_urlencoded};

/// Placeholder in a ping endpoint replaced by the encoded sitemap URL.
pub const SITEMAP_PLACEHOLDER: &str = "{sitemap}";

/// Notification errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// A configured ping endpoint is not a valid URL.
    #[error("invalid ping endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}

/// Tells search engines that a sitemap changed.
#[async_trait]
pub trait SitemapNotifier: Send + Sync {
    async fn notify(&self, sitemap_url: &str) -> Result<(), NotifyError>;
}

/// Builds ping URLs and logs them without making network calls.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    engines: Vec<String>,
}

impl LogNotifier {
    /// `engines` are endpoint templates containing [`SITEMAP_PLACEHOLDER`].
    pub fn new(engines: Vec<String>) -> Self {
        Self { engines }
    }

    /// Ping URL for each engine, with `sitemap_url` percent-encoded.
    pub fn ping_urls(&self, sitemap_url: &str) -> Result<Vec<Url>, NotifyError> {
        let encoded: String = form_urlencoded::byte_serialize(sitemap_url.as_bytes()).collect();

        self.engines
            .iter()
            .map(|engine| {
                let endpoint = engine.replace(SITEMAP_PLACEHOLDER, &encoded);
                Url::parse(&endpoint).map_err(|source| NotifyError::InvalidEndpoint { endpoint, source })
            })
            .collect()
    }
}

#[async_trait]
impl SitemapNotifier for LogNotifier {
    async fn notify(&self, sitemap_url: &str) -> Result<(), NotifyError> {
        for url in self.ping_urls(sitemap_url)? {
            info!(%url, "would ping search engine");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engines() -> Vec<String> {
        vec![
            "https://www.google.com/ping?sitemap={sitemap}".to_string(),
            "https://www.bing.com/ping?sitemap={sitemap}".to_string(),
        ]
    }

    #[test]
    fn test_ping_urls_are_encoded() {
        let notifier = LogNotifier::new(engines());
        let urls = notifier
            .ping_urls("https://seasalt.ai/sitemap.xml")
            .expect("valid endpoints");

        assert_eq!(urls.len(), 2);
        assert_eq!(
            urls[0].as_str(),
            "https://www.google.com/ping?sitemap=https%3A%2F%2Fseasalt.ai%2Fsitemap.xml"
        );
        assert_eq!(urls[1].host_str(), Some("www.bing.com"));
    }

    #[test]
    fn test_invalid_endpoint() {
        let notifier = LogNotifier::new(vec!["not a url {sitemap}".to_string()]);
        let err = notifier.ping_urls("https://seasalt.ai/sitemap.xml").unwrap_err();
        assert!(matches!(err, NotifyError::InvalidEndpoint { .. }));
    }

    #[tokio::test]
    async fn test_notify_logs_only() {
        let notifier = LogNotifier::new(engines());
        notifier
            .notify("https://seasalt.ai/sitemap.xml")
            .await
            .expect("notify");
    }
}
