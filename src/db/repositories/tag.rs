//! Tag repository
//!
//! Database operations for tags.
//!
//! This module provides:
//! - `TagRepository` trait defining the interface for tag data access
//! - `SqlxTagRepository` implementing the trait for SQLite and MySQL
//!
//! Entries store their tags as a delimited id list; `resolve` turns such a
//! list into tag labels with a single bound `IN (...)` query.

use crate::config::DatabaseDriver;
use crate::db::pool::{mysql_pool, sqlite_pool};
use crate::db::{DynDatabasePool, TAGS_TABLE};
use crate::models::{parse_tag_ids, DEFAULT_TAG_DELIMITER};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Every distinct tag label, sorted by name
    async fn list_names(&self) -> Result<Vec<String>>;

    /// Resolve a delimited tag id list (e.g. `2|3|`) to tag labels.
    ///
    /// Labels come back in reference order. Empty, malformed and unknown
    /// ids are skipped.
    async fn resolve(&self, reference: &str) -> Result<Vec<String>>;
}

/// SQLx-based tag repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxTagRepository {
    pool: DynDatabasePool,
    delimiter: char,
}

impl SqlxTagRepository {
    /// Create a new SQLx tag repository using the `|` delimiter
    pub fn new(pool: DynDatabasePool) -> Self {
        Self {
            pool,
            delimiter: DEFAULT_TAG_DELIMITER,
        }
    }

    /// Use a different separator for tag id lists
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn list_names(&self) -> Result<Vec<String>> {
        let table = self.pool.table(TAGS_TABLE);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_tag_names_sqlite(sqlite_pool(&self.pool)?, &table).await,
            DatabaseDriver::Mysql => list_tag_names_mysql(mysql_pool(&self.pool)?, &table).await,
        }
    }

    async fn resolve(&self, reference: &str) -> Result<Vec<String>> {
        let parsed = parse_tag_ids(reference, self.delimiter);
        if !parsed.discarded.is_empty() {
            tracing::warn!(
                "Ignoring malformed tag ids {:?} in reference '{}'",
                parsed.discarded,
                reference
            );
        }
        if parsed.is_empty() {
            return Ok(Vec::new());
        }

        let table = self.pool.table(TAGS_TABLE);
        let mut found = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                find_tags_sqlite(sqlite_pool(&self.pool)?, &table, &parsed.ids).await?
            }
            DatabaseDriver::Mysql => {
                find_tags_mysql(mysql_pool(&self.pool)?, &table, &parsed.ids).await?
            }
        };

        // Keep the order the editor chose
        found.sort_by_key(|(id, _)| parsed.ids.iter().position(|p| p == id));
        Ok(found.into_iter().map(|(_, tag)| tag).collect())
    }
}

/// `id_column` lets MySQL cast unsigned ids to a signed type
fn find_tags_sql(table: &str, id_column: &str, count: usize) -> String {
    let placeholders = vec!["?"; count].join(", ");
    format!(
        "SELECT {} AS id, tag FROM {} WHERE id IN ({})",
        id_column, table, placeholders
    )
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn list_tag_names_sqlite(pool: &SqlitePool, table: &str) -> Result<Vec<String>> {
    let sql = format!("SELECT DISTINCT tag FROM {} ORDER BY tag", table);
    let rows = sqlx::query(&sql)
        .fetch_all(pool)
        .await
        .context("Failed to list tags")?;

    let mut tags = Vec::with_capacity(rows.len());
    for row in rows {
        tags.push(row.try_get("tag")?);
    }

    tracing::debug!("Listed {} tags", tags.len());
    Ok(tags)
}

async fn find_tags_sqlite(
    pool: &SqlitePool,
    table: &str,
    ids: &[i64],
) -> Result<Vec<(i64, String)>> {
    let sql = find_tags_sql(table, "id", ids.len());
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(*id);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to resolve tag ids")?;

    let mut tags = Vec::with_capacity(rows.len());
    for row in rows {
        tags.push((row.try_get("id")?, row.try_get("tag")?));
    }
    Ok(tags)
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn list_tag_names_mysql(pool: &MySqlPool, table: &str) -> Result<Vec<String>> {
    let sql = format!("SELECT DISTINCT tag FROM {} ORDER BY tag", table);
    let rows = sqlx::query(&sql)
        .fetch_all(pool)
        .await
        .context("Failed to list tags")?;

    let mut tags = Vec::with_capacity(rows.len());
    for row in rows {
        tags.push(row.try_get("tag")?);
    }

    tracing::debug!("Listed {} tags", tags.len());
    Ok(tags)
}

async fn find_tags_mysql(
    pool: &MySqlPool,
    table: &str,
    ids: &[i64],
) -> Result<Vec<(i64, String)>> {
    let sql = find_tags_sql(table, "CAST(id AS SIGNED)", ids.len());
    let mut query = sqlx::query(&sql);
    for id in ids {
        query = query.bind(*id);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .context("Failed to resolve tag ids")?;

    let mut tags = Vec::with_capacity(rows.len());
    for row in rows {
        tags.push((row.try_get("id")?, row.try_get("tag")?));
    }
    Ok(tags)
}
