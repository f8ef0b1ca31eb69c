//! Content sources.
//!
//! A [`ContentSource`] supplies published content records. Lookups that find
//! nothing return `Ok(None)` or an empty vector rather than an error.

pub mod cache;
pub mod clock;
pub mod git;
pub mod markdown;
pub mod mock;

use async_trait::async_trait;
use seokit_core::ContentRecord;
use thiserror::Error;

pub use cache::TtlCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use git::GitContentSource;
pub use markdown::MarkdownContentSource;
pub use mock::MockContentSource;

/// Content source errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A blocking parse task panicked or was cancelled.
    #[error("content loading task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for content source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Provider of published content.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Every published record.
    async fn all_published(&self) -> Result<Vec<ContentRecord>>;

    /// The record with this slug in this language.
    async fn by_slug(&self, slug: &str, language: &str) -> Result<Option<ContentRecord>>;

    /// The record with this id.
    async fn by_id(&self, id: &str) -> Result<Option<ContentRecord>>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}
