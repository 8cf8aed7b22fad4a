//! Entry repository
//!
//! Database operations for blog entries.
//!
//! This module provides:
//! - `EntryRepository` trait defining the interface for entry data access
//! - `SqlxEntryRepository` implementing the trait for SQLite and MySQL
//!
//! Entries are read joined with their category name. Each mapped row has its
//! tag id list resolved through the injected `TagRepository`.

use super::tag::TagRepository;
use crate::config::DatabaseDriver;
use crate::db::pool::{mysql_pool, sqlite_pool};
use crate::db::{DynDatabasePool, CATEGORIES_TABLE, ENTRIES_TABLE};
use crate::models::{Entry, MonthBucket};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Entry repository trait
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Get entry by ID.
    ///
    /// With `ignore_offline` set, offline entries are treated as missing.
    async fn get_by_id(&self, id: i64, ignore_offline: bool) -> Result<Option<Entry>>;

    /// Newest entries first (by publication date, then id), at most `limit`
    async fn list_latest(&self, limit: usize, ignore_offline: bool) -> Result<Vec<Entry>>;

    /// Distinct publication months.
    ///
    /// With `ignore_offline` set, offline entries and translations do not
    /// contribute a month. `reverse` orders newest first.
    async fn list_months(&self, reverse: bool, ignore_offline: bool) -> Result<Vec<MonthBucket>>;
}

/// SQLx-based entry repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxEntryRepository {
    pool: DynDatabasePool,
    tags: Arc<dyn TagRepository>,
}

impl SqlxEntryRepository {
    /// Create a new SQLx entry repository
    ///
    /// # Arguments
    /// * `pool` - Database pool
    /// * `tags` - Resolves the tag id list of each entry
    pub fn new(pool: DynDatabasePool, tags: Arc<dyn TagRepository>) -> Self {
        Self { pool, tags }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool, tags: Arc<dyn TagRepository>) -> Arc<dyn EntryRepository> {
        Arc::new(Self::new(pool, tags))
    }

    /// Attach resolved tag labels to freshly mapped rows
    async fn with_tags(&self, rows: Vec<(Entry, String)>) -> Result<Vec<Entry>> {
        let mut entries = Vec::with_capacity(rows.len());
        for (mut entry, reference) in rows {
            entry.tags = self
                .tags
                .resolve(&reference)
                .await
                .with_context(|| format!("Failed to resolve tags of entry {}", entry.id))?;
            entries.push(entry);
        }
        Ok(entries)
    }

    fn entries_query(&self, select: &str) -> String {
        format!(
            "{} FROM {} AS e LEFT JOIN {} AS c ON e.category = c.id",
            select,
            self.pool.table(ENTRIES_TABLE),
            self.pool.table(CATEGORIES_TABLE)
        )
    }
}

#[async_trait]
impl EntryRepository for SqlxEntryRepository {
    async fn get_by_id(&self, id: i64, ignore_offline: bool) -> Result<Option<Entry>> {
        tracing::debug!("Fetching entry {} (ignore_offline: {})", id, ignore_offline);

        let rows = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let sql = get_entry_sql(&self.entries_query(SELECT_ENTRY_SQLITE), ignore_offline);
                get_entry_sqlite(sqlite_pool(&self.pool)?, &sql, id).await?
            }
            DatabaseDriver::Mysql => {
                let sql = get_entry_sql(&self.entries_query(SELECT_ENTRY_MYSQL), ignore_offline);
                get_entry_mysql(mysql_pool(&self.pool)?, &sql, id).await?
            }
        };

        Ok(self.with_tags(rows).await?.into_iter().next())
    }

    async fn list_latest(&self, limit: usize, ignore_offline: bool) -> Result<Vec<Entry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let sql = latest_entries_sql(
                    &self.entries_query(SELECT_ENTRY_SQLITE),
                    POSTED_AT_ORDER_SQLITE,
                    ignore_offline,
                );
                list_entries_sqlite(sqlite_pool(&self.pool)?, &sql, limit).await?
            }
            DatabaseDriver::Mysql => {
                let sql = latest_entries_sql(
                    &self.entries_query(SELECT_ENTRY_MYSQL),
                    POSTED_AT_ORDER_MYSQL,
                    ignore_offline,
                );
                list_entries_mysql(mysql_pool(&self.pool)?, &sql, limit).await?
            }
        };

        tracing::debug!("Fetched {} latest entries (limit {})", rows.len(), limit);
        self.with_tags(rows).await
    }

    async fn list_months(&self, reverse: bool, ignore_offline: bool) -> Result<Vec<MonthBucket>> {
        let table = self.pool.table(ENTRIES_TABLE);
        let months = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let sql = months_sql(SELECT_MONTHS_SQLITE, &table, reverse, ignore_offline);
                list_months_sqlite(sqlite_pool(&self.pool)?, &sql).await?
            }
            DatabaseDriver::Mysql => {
                let sql = months_sql(SELECT_MONTHS_MYSQL, &table, reverse, ignore_offline);
                list_months_mysql(mysql_pool(&self.pool)?, &sql).await?
            }
        };

        tracing::debug!("Listed {} archive months", months.len());
        Ok(months)
    }
}

// ============================================================================
// Query text
// ============================================================================

const SELECT_ENTRY_SQLITE: &str = r#"
    SELECT e.id AS id, e.aid AS aid, e.translation AS translation, e.clang AS clang,
        c.name AS category_name, e.preview AS preview, e.headline AS headline,
        e.content AS content, e.gallery AS gallery, e.tags AS tags, e.offline AS offline,
        e.postedAt AS posted_at, e.createdBy AS created_by, e.createdAt AS created_at,
        e.updatedBy AS updated_by, e.updatedAt AS updated_at
"#;

// Integer columns of the host CMS are unsigned on MySQL
const SELECT_ENTRY_MYSQL: &str = r#"
    SELECT CAST(e.id AS SIGNED) AS id, CAST(e.aid AS SIGNED) AS aid,
        CAST(e.translation AS SIGNED) AS translation, CAST(e.clang AS SIGNED) AS clang,
        c.name AS category_name, e.preview AS preview, e.headline AS headline,
        e.content AS content, e.gallery AS gallery, e.tags AS tags,
        CAST(e.offline AS SIGNED) AS offline,
        e.postedAt AS posted_at, e.createdBy AS created_by, e.createdAt AS created_at,
        e.updatedBy AS updated_by, e.updatedAt AS updated_at
"#;

// SQLite keeps timestamps as text in whatever format the writer chose
// (`2023-01-05 23:00:00`, RFC 3339 with any offset), so compare instants
const POSTED_AT_ORDER_SQLITE: &str = "julianday(e.postedAt)";
const POSTED_AT_ORDER_MYSQL: &str = "e.postedAt";

const SELECT_MONTHS_SQLITE: &str = r#"
    SELECT DISTINCT
        CAST(strftime('%Y', postedAt) AS INTEGER) AS year,
        CAST(strftime('%m', postedAt) AS INTEGER) AS month
"#;

const SELECT_MONTHS_MYSQL: &str = r#"
    SELECT DISTINCT
        CAST(YEAR(postedAt) AS SIGNED) AS year,
        CAST(MONTH(postedAt) AS SIGNED) AS month
"#;

fn get_entry_sql(base: &str, ignore_offline: bool) -> String {
    let mut sql = format!("{} WHERE e.id = ?", base);
    if ignore_offline {
        sql.push_str(" AND e.offline = 0");
    }
    sql
}

fn latest_entries_sql(base: &str, posted_at: &str, ignore_offline: bool) -> String {
    let mut sql = base.to_string();
    if ignore_offline {
        sql.push_str(" WHERE e.offline = 0");
    }
    sql.push_str(&format!(" ORDER BY {} DESC, e.id DESC LIMIT ?", posted_at));
    sql
}

fn months_sql(select: &str, table: &str, reverse: bool, ignore_offline: bool) -> String {
    let filter = if ignore_offline {
        "WHERE offline = 0 AND translation = 0"
    } else {
        ""
    };
    let order = if reverse {
        "ORDER BY year DESC, month DESC"
    } else {
        "ORDER BY year ASC, month ASC"
    };
    format!("{} FROM {} {} {}", select, table, filter, order)
}

/// Build a month bucket from the extracted parts; rows whose date the
/// database could not parse come back as NULL and are skipped.
fn month_bucket(year: Option<i64>, month: Option<i64>) -> Option<MonthBucket> {
    let year = i32::try_from(year?).ok()?;
    let month = u32::try_from(month?).ok()?;
    Some(MonthBucket::new(year, month))
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn get_entry_sqlite(pool: &SqlitePool, sql: &str, id: i64) -> Result<Vec<(Entry, String)>> {
    let row = sqlx::query(sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get entry by ID")?;

    match row {
        Some(row) => Ok(vec![row_to_entry_sqlite(&row)?]),
        None => Ok(Vec::new()),
    }
}

async fn list_entries_sqlite(
    pool: &SqlitePool,
    sql: &str,
    limit: i64,
) -> Result<Vec<(Entry, String)>> {
    let rows = sqlx::query(sql)
        .bind(limit)
        .fetch_all(pool)
        .await
        .context("Failed to list latest entries")?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        entries.push(row_to_entry_sqlite(&row)?);
    }
    Ok(entries)
}

async fn list_months_sqlite(pool: &SqlitePool, sql: &str) -> Result<Vec<MonthBucket>> {
    let rows = sqlx::query(sql)
        .fetch_all(pool)
        .await
        .context("Failed to list entry months")?;

    let mut months = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(month) = month_bucket(row.try_get("year")?, row.try_get("month")?) {
            months.push(month);
        }
    }
    Ok(months)
}

/// Map a row to an entry without tags, plus its raw tag reference
fn row_to_entry_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<(Entry, String)> {
    let translation: i64 = row.try_get("translation")?;
    let offline: i64 = row.try_get("offline")?;
    let tags: Option<String> = row.try_get("tags")?;

    let entry = Entry {
        id: row.try_get("id")?,
        aid: row.try_get("aid")?,
        translation: translation != 0,
        clang: row.try_get("clang")?,
        category: row.try_get("category_name")?,
        preview: row.try_get::<Option<String>, _>("preview")?.unwrap_or_default(),
        headline: row.try_get::<Option<String>, _>("headline")?.unwrap_or_default(),
        content: row.try_get::<Option<String>, _>("content")?.unwrap_or_default(),
        gallery: row.try_get("gallery")?,
        tags: Vec::new(),
        offline: offline != 0,
        posted_at: row.try_get("posted_at")?,
        created_by: row.try_get::<Option<String>, _>("created_by")?.unwrap_or_default(),
        created_at: row.try_get("created_at")?,
        updated_by: row.try_get::<Option<String>, _>("updated_by")?.unwrap_or_default(),
        updated_at: row.try_get("updated_at")?,
    };

    Ok((entry, tags.unwrap_or_default()))
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn get_entry_mysql(pool: &MySqlPool, sql: &str, id: i64) -> Result<Vec<(Entry, String)>> {
    let row = sqlx::query(sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get entry by ID")?;

    match row {
        Some(row) => Ok(vec![row_to_entry_mysql(&row)?]),
        None => Ok(Vec::new()),
    }
}

async fn list_entries_mysql(
    pool: &MySqlPool,
    sql: &str,
    limit: i64,
) -> Result<Vec<(Entry, String)>> {
    let rows = sqlx::query(sql)
        .bind(limit)
        .fetch_all(pool)
        .await
        .context("Failed to list latest entries")?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        entries.push(row_to_entry_mysql(&row)?);
    }
    Ok(entries)
}

async fn list_months_mysql(pool: &MySqlPool, sql: &str) -> Result<Vec<MonthBucket>> {
    let rows = sqlx::query(sql)
        .fetch_all(pool)
        .await
        .context("Failed to list entry months")?;

    let mut months = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(month) = month_bucket(row.try_get("year")?, row.try_get("month")?) {
            months.push(month);
        }
    }
    Ok(months)
}

fn row_to_entry_mysql(row: &sqlx::mysql::MySqlRow) -> Result<(Entry, String)> {
    let translation: i64 = row.try_get("translation")?;
    let offline: i64 = row.try_get("offline")?;
    let tags: Option<String> = row.try_get("tags")?;

    let entry = Entry {
        id: row.try_get("id")?,
        aid: row.try_get("aid")?,
        translation: translation != 0,
        clang: row.try_get("clang")?,
        category: row.try_get("category_name")?,
        preview: row.try_get::<Option<String>, _>("preview")?.unwrap_or_default(),
        headline: row.try_get::<Option<String>, _>("headline")?.unwrap_or_default(),
        content: row.try_get::<Option<String>, _>("content")?.unwrap_or_default(),
        gallery: row.try_get("gallery")?,
        tags: Vec::new(),
        offline: offline != 0,
        posted_at: row.try_get("posted_at")?,
        created_by: row.try_get::<Option<String>, _>("created_by")?.unwrap_or_default(),
        created_at: row.try_get("created_at")?,
        updated_by: row.try_get::<Option<String>, _>("updated_by")?.unwrap_or_default(),
        updated_at: row.try_get("updated_at")?,
    };

    Ok((entry, tags.unwrap_or_default()))
}
