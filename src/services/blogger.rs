//! Blogger service
//!
//! The read API handed to the host CMS templates:
//! - single entry by id
//! - latest entries
//! - tag and category labels
//! - archive months
//!
//! Every operation is a single-shot query through the injected repositories.
//! Failures are never retried; they surface as `BloggerError`.

use crate::config::BloggerConfig;
use crate::db::repositories::{
    CategoryRepository, EntryRepository, SqlxCategoryRepository, SqlxEntryRepository,
    SqlxTagRepository, TagRepository,
};
use crate::db::DynDatabasePool;
use crate::models::{Entry, MonthBucket};
use std::sync::Arc;

/// Error types for blogger service operations
#[derive(Debug, thiserror::Error)]
pub enum BloggerError {
    /// No visible entry with this id
    #[error("Entry not found: {0}")]
    NotFound(i64),

    /// The database driver reported an error
    #[error("Query failed: {0:#}")]
    QueryFailure(#[from] anyhow::Error),
}

/// Blog entry queries
pub struct BloggerService {
    entries: Arc<dyn EntryRepository>,
    tags: Arc<dyn TagRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl BloggerService {
    /// Hide offline entries unless told otherwise
    pub const DEFAULT_IGNORE_OFFLINE: bool = true;
    /// `get_latest` returns a single entry unless told otherwise
    pub const DEFAULT_LATEST_LIMIT: usize = 1;
    /// Archive months are listed newest first unless told otherwise
    pub const DEFAULT_REVERSE_MONTHS: bool = true;

    /// Create a new blogger service
    ///
    /// # Arguments
    /// * `entries` - Entry repository
    /// * `tags` - Tag repository
    /// * `categories` - Category repository
    pub fn new(
        entries: Arc<dyn EntryRepository>,
        tags: Arc<dyn TagRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            entries,
            tags,
            categories,
        }
    }

    /// Wire the SQLx repositories onto one pool
    pub fn from_pool(pool: DynDatabasePool, config: &BloggerConfig) -> Self {
        let tags: Arc<dyn TagRepository> =
            Arc::new(SqlxTagRepository::new(pool.clone()).with_delimiter(config.tag_delimiter));
        let entries = SqlxEntryRepository::boxed(pool.clone(), tags.clone());
        let categories = SqlxCategoryRepository::boxed(pool);
        Self::new(entries, tags, categories)
    }

    /// Get an entry by id, joined with its category name and tag labels
    ///
    /// # Errors
    /// - `NotFound` if no row matches, or the row is offline while
    ///   `ignore_offline` is set
    pub async fn get_by_id(&self, id: i64, ignore_offline: bool) -> Result<Entry, BloggerError> {
        self.entries
            .get_by_id(id, ignore_offline)
            .await?
            .ok_or(BloggerError::NotFound(id))
    }

    /// Most recent entries by publication date, newest first, at most `limit`.
    ///
    /// Entries published at the same instant are ordered by id, highest first.
    pub async fn get_latest(
        &self,
        limit: usize,
        ignore_offline: bool,
    ) -> Result<Vec<Entry>, BloggerError> {
        Ok(self.entries.list_latest(limit, ignore_offline).await?)
    }

    /// Every distinct tag label
    pub async fn get_tags(&self) -> Result<Vec<String>, BloggerError> {
        Ok(self.tags.list_names().await?)
    }

    /// Every distinct category label
    pub async fn get_categories(&self) -> Result<Vec<String>, BloggerError> {
        Ok(self.categories.list_names().await?)
    }

    /// Distinct publication months for archive navigation.
    ///
    /// With `ignore_offline`, offline entries and translations are left out.
    pub async fn get_all_months(
        &self,
        reverse: bool,
        ignore_offline: bool,
    ) -> Result<Vec<MonthBucket>, BloggerError> {
        Ok(self.entries.list_months(reverse, ignore_offline).await?)
    }
}
