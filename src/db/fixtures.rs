//! Test fixtures
//!
//! Creates the blogger tables as the host CMS lays them out and seeds rows.
//! Only compiled for tests; the crate never creates or alters tables itself.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

use super::pool::{mysql_pool, sqlite_pool};
use super::{create_pool, create_test_pool, DynDatabasePool};
use super::{CATEGORIES_TABLE, ENTRIES_TABLE, TAGS_TABLE};
use crate::config::{DatabaseConfig, DatabaseDriver};

const SCHEMA_SQLITE: &str = r#"
    CREATE TABLE IF NOT EXISTS {prefix}blogger_categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(255) NOT NULL
    );
    CREATE TABLE IF NOT EXISTS {prefix}blogger_tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tag VARCHAR(255) NOT NULL
    );
    CREATE TABLE IF NOT EXISTS {prefix}blogger_entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        aid INTEGER NOT NULL DEFAULT 0,
        translation INTEGER NOT NULL DEFAULT 0,
        clang INTEGER NOT NULL DEFAULT 1,
        category INTEGER,
        preview TEXT NOT NULL DEFAULT '',
        headline VARCHAR(255) NOT NULL DEFAULT '',
        content TEXT NOT NULL DEFAULT '',
        gallery TEXT,
        tags TEXT NOT NULL DEFAULT '',
        offline INTEGER NOT NULL DEFAULT 0,
        postedAt TIMESTAMP NOT NULL,
        createdBy VARCHAR(255) NOT NULL DEFAULT '',
        createdAt TIMESTAMP NOT NULL,
        updatedBy VARCHAR(255) NOT NULL DEFAULT '',
        updatedAt TIMESTAMP NOT NULL
    );
"#;

// Unsigned ids and DATETIME columns, as the CMS installer creates them
const SCHEMA_MYSQL: &str = r#"
    DROP TABLE IF EXISTS {prefix}blogger_entries;
    DROP TABLE IF EXISTS {prefix}blogger_tags;
    DROP TABLE IF EXISTS {prefix}blogger_categories;
    CREATE TABLE {prefix}blogger_categories (
        id INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(255) NOT NULL
    );
    CREATE TABLE {prefix}blogger_tags (
        id INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        tag VARCHAR(255) NOT NULL
    );
    CREATE TABLE {prefix}blogger_entries (
        id INT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
        aid INT UNSIGNED NOT NULL DEFAULT 0,
        translation TINYINT(1) NOT NULL DEFAULT 0,
        clang INT UNSIGNED NOT NULL DEFAULT 1,
        category INT UNSIGNED NULL,
        preview TEXT,
        headline VARCHAR(255) NOT NULL DEFAULT '',
        content TEXT,
        gallery TEXT NULL,
        tags TEXT,
        offline TINYINT(1) NOT NULL DEFAULT 0,
        postedAt DATETIME NOT NULL,
        createdBy VARCHAR(255) NOT NULL DEFAULT '',
        createdAt DATETIME NOT NULL,
        updatedBy VARCHAR(255) NOT NULL DEFAULT '',
        updatedAt DATETIME NOT NULL
    );
"#;

/// One row of the entries table; unset columns fall back to the defaults
/// an editor would leave behind.
#[derive(Debug, Clone)]
pub struct EntryRow {
    pub aid: i64,
    pub translation: i64,
    pub clang: i64,
    pub category: Option<i64>,
    pub preview: String,
    pub headline: String,
    pub content: String,
    pub gallery: Option<String>,
    pub tags: String,
    pub offline: i64,
    pub posted_at: DateTime<Utc>,
    /// Stored verbatim in `postedAt` instead of `posted_at`
    pub posted_raw: Option<String>,
}

impl EntryRow {
    pub fn posted(year: i32, month: u32, day: u32) -> Self {
        Self {
            posted_at: utc(year, month, day),
            ..Self::default()
        }
    }

    /// Publication time written as literal column text, e.g. the
    /// `YYYY-MM-DD HH:MM:SS` form the CMS backend stores
    pub fn posted_raw(text: &str) -> Self {
        Self {
            posted_raw: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn headline(mut self, headline: &str) -> Self {
        self.headline = headline.to_string();
        self
    }

    pub fn category(mut self, category: i64) -> Self {
        self.category = Some(category);
        self
    }

    pub fn tags(mut self, tags: &str) -> Self {
        self.tags = tags.to_string();
        self
    }

    pub fn offline(mut self) -> Self {
        self.offline = 1;
        self
    }

    pub fn translation(mut self, clang: i64) -> Self {
        self.translation = 1;
        self.clang = clang;
        self
    }
}

impl Default for EntryRow {
    fn default() -> Self {
        Self {
            aid: 1,
            translation: 0,
            clang: 1,
            category: None,
            preview: "Preview".to_string(),
            headline: "Headline".to_string(),
            content: "<p>Content</p>".to_string(),
            gallery: None,
            tags: String::new(),
            offline: 0,
            posted_at: utc(2023, 1, 1),
            posted_raw: None,
        }
    }
}

pub fn utc(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid fixture date")
        .and_utc()
}

/// In-memory pool with the blogger tables created under the `rex_` prefix
pub async fn setup_blogger_pool() -> DynDatabasePool {
    let pool = create_test_pool().await.expect("Failed to create test pool");
    create_schema(&pool, SCHEMA_SQLITE)
        .await
        .expect("Failed to create blogger tables");
    pool
}

/// MySQL pool with fresh blogger tables under `prefix`.
///
/// Connects to `MYSQL_TEST_URL`; every test passes its own prefix so runs
/// do not share tables.
pub async fn setup_mysql_blogger_pool(prefix: &str) -> DynDatabasePool {
    let url = std::env::var("MYSQL_TEST_URL")
        .unwrap_or_else(|_| "mysql://root@localhost/test".to_string());
    let config = DatabaseConfig {
        driver: DatabaseDriver::Mysql,
        url,
        table_prefix: prefix.to_string(),
    };

    let pool = create_pool(&config).await.expect("Failed to create MySQL pool");
    create_schema(&pool, SCHEMA_MYSQL)
        .await
        .expect("Failed to create blogger tables");
    pool
}

async fn create_schema(pool: &DynDatabasePool, schema: &str) -> Result<()> {
    let sql = schema.replace("{prefix}", pool.table_prefix());
    for statement in sql.split(';') {
        let statement = statement.trim();
        if !statement.is_empty() {
            pool.execute(statement).await?;
        }
    }
    Ok(())
}

pub async fn insert_category(pool: &DynDatabasePool, id: i64, name: &str) -> Result<()> {
    let sql = format!("INSERT INTO {} (id, name) VALUES (?, ?)", pool.table(CATEGORIES_TABLE));
    let inserted = match pool.driver() {
        DatabaseDriver::Sqlite => {
            sqlx::query(&sql).bind(id).bind(name).execute(sqlite_pool(pool)?).await.map(|_| ())
        }
        DatabaseDriver::Mysql => {
            sqlx::query(&sql).bind(id).bind(name).execute(mysql_pool(pool)?).await.map(|_| ())
        }
    };
    inserted.context("Failed to insert category")
}

pub async fn insert_tag(pool: &DynDatabasePool, id: i64, tag: &str) -> Result<()> {
    let sql = format!("INSERT INTO {} (id, tag) VALUES (?, ?)", pool.table(TAGS_TABLE));
    let inserted = match pool.driver() {
        DatabaseDriver::Sqlite => {
            sqlx::query(&sql).bind(id).bind(tag).execute(sqlite_pool(pool)?).await.map(|_| ())
        }
        DatabaseDriver::Mysql => {
            sqlx::query(&sql).bind(id).bind(tag).execute(mysql_pool(pool)?).await.map(|_| ())
        }
    };
    inserted.context("Failed to insert tag")
}

/// Bind every column of an entry row in `INSERT` order
macro_rules! bind_entry {
    ($query:expr, $row:expr) => {{
        let row = $row;
        let query = $query
            .bind(row.aid)
            .bind(row.translation)
            .bind(row.clang)
            .bind(row.category)
            .bind(&row.preview)
            .bind(&row.headline)
            .bind(&row.content)
            .bind(&row.gallery)
            .bind(&row.tags)
            .bind(row.offline);
        let query = match &row.posted_raw {
            Some(text) => query.bind(text.clone()),
            None => query.bind(row.posted_at),
        };
        query.bind(row.posted_at).bind(row.posted_at)
    }};
}

pub async fn insert_entry(pool: &DynDatabasePool, row: &EntryRow) -> Result<i64> {
    let sql = format!(
        r#"
        INSERT INTO {} (aid, translation, clang, category, preview, headline, content,
            gallery, tags, offline, postedAt, createdBy, createdAt, updatedBy, updatedAt)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'admin', ?, 'admin', ?)
        "#,
        pool.table(ENTRIES_TABLE)
    );

    match pool.driver() {
        DatabaseDriver::Sqlite => {
            let result = bind_entry!(sqlx::query(&sql), row)
                .execute(sqlite_pool(pool)?)
                .await
                .context("Failed to insert entry")?;
            Ok(result.last_insert_rowid())
        }
        DatabaseDriver::Mysql => {
            let result = bind_entry!(sqlx::query(&sql), row)
                .execute(mysql_pool(pool)?)
                .await
                .context("Failed to insert entry")?;
            i64::try_from(result.last_insert_id()).context("Entry id out of range")
        }
    }
}
