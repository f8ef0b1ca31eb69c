//! Placeholder source for a git-backed content repository.

use std::path::PathBuf;

use async_trait::async_trait;
use seokit_core::ContentRecord;
use tracing::info;

use super::{ContentSource, Result};

/// Content read from a checked-out git repository.
///
/// Fetching is not wired up yet, so every query returns nothing.
#[derive(Debug, Clone)]
pub struct GitContentSource {
    content_dir: PathBuf,
}

impl GitContentSource {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }
}

#[async_trait]
impl ContentSource for GitContentSource {
    async fn all_published(&self) -> Result<Vec<ContentRecord>> {
        info!(dir = %self.content_dir.display(), "git content source has no records");
        Ok(Vec::new())
    }

    async fn by_slug(&self, slug: &str, language: &str) -> Result<Option<ContentRecord>> {
        info!(slug, language, "git content source lookup by slug");
        Ok(None)
    }

    async fn by_id(&self, id: &str) -> Result<Option<ContentRecord>> {
        info!(id, "git content source lookup by id");
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "git"
    }
}
