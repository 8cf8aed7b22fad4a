//! Database connection pool abstraction
//!
//! This module provides a unified interface for database operations that works
//! with both SQLite and MySQL backends. The appropriate pool is created based
//! on the configuration. Every pool carries the host CMS table prefix so
//! repositories can build fully qualified table names.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    mysql::{MySqlPool, MySqlPoolOptions},
    sqlite::{SqlitePool, SqlitePoolOptions},
};
use std::sync::Arc;

use crate::config::{validate_table_prefix, DatabaseConfig, DatabaseDriver};

/// Database pool trait that abstracts over different database backends.
///
/// This trait provides a unified interface for database operations,
/// allowing the repositories to work with either SQLite or MySQL
/// without knowing the specific backend.
#[async_trait]
pub trait DatabasePool: Send + Sync {
    /// Execute a raw SQL statement that doesn't return rows
    async fn execute(&self, query: &str) -> Result<u64>;

    /// Check if the database connection is healthy
    async fn ping(&self) -> Result<()>;

    /// Close the connection pool
    async fn close(&self);

    /// Get the database driver type
    fn driver(&self) -> DatabaseDriver;

    /// Prefix prepended to every table of the host CMS
    fn table_prefix(&self) -> &str;

    /// Get the underlying SQLite pool if this is a SQLite connection
    fn as_sqlite(&self) -> Option<&SqlitePool>;

    /// Get the underlying MySQL pool if this is a MySQL connection
    fn as_mysql(&self) -> Option<&MySqlPool>;

    /// Fully qualified table name, e.g. `rex_blogger_entries`
    fn table(&self, name: &str) -> String {
        format!("{}{}", self.table_prefix(), name)
    }
}

/// SQLite connection pool implementation
pub struct SqliteDatabase {
    pool: SqlitePool,
    table_prefix: String,
}

impl SqliteDatabase {
    /// Create a new SQLite connection pool
    pub async fn new(url: &str, table_prefix: &str) -> Result<Self> {
        validate_table_prefix(table_prefix)?;

        // The CMS owns the database file; never create one
        let connection_url = if url == ":memory:" || url.starts_with("sqlite::memory:") {
            "sqlite::memory:".to_string()
        } else if url.starts_with("sqlite:") {
            if url.contains('?') {
                url.to_string()
            } else {
                format!("{}?mode=rw", url)
            }
        } else {
            format!("sqlite:{}?mode=rw", url)
        };

        // In-memory databases live and die with a connection
        let max_connections = if connection_url == "sqlite::memory:" {
            1
        } else {
            20
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&connection_url)
            .await
            .with_context(|| format!("Failed to connect to SQLite database: {}", url))?;

        Ok(Self {
            pool,
            table_prefix: table_prefix.to_string(),
        })
    }

}

#[async_trait]
impl DatabasePool for SqliteDatabase {
    async fn execute(&self, query: &str) -> Result<u64> {
        let result = sqlx::query(query)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to execute query: {}", query))?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn driver(&self) -> DatabaseDriver {
        DatabaseDriver::Sqlite
    }

    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn as_sqlite(&self) -> Option<&SqlitePool> {
        Some(&self.pool)
    }

    fn as_mysql(&self) -> Option<&MySqlPool> {
        None
    }
}

/// MySQL connection pool implementation
pub struct MysqlDatabase {
    pool: MySqlPool,
    table_prefix: String,
}

impl MysqlDatabase {
    /// Create a new MySQL connection pool
    pub async fn new(url: &str, table_prefix: &str) -> Result<Self> {
        validate_table_prefix(table_prefix)?;

        let connection_url = if url.starts_with("mysql://") {
            url.to_string()
        } else {
            format!("mysql://{}", url)
        };

        let pool = MySqlPoolOptions::new()
            .max_connections(30)
            .connect(&connection_url)
            .await
            .with_context(|| format!("Failed to connect to MySQL database: {}", url))?;

        Ok(Self {
            pool,
            table_prefix: table_prefix.to_string(),
        })
    }

}

#[async_trait]
impl DatabasePool for MysqlDatabase {
    async fn execute(&self, query: &str) -> Result<u64> {
        let result = sqlx::query(query)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to execute query: {}", query))?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    fn driver(&self) -> DatabaseDriver {
        DatabaseDriver::Mysql
    }

    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn as_sqlite(&self) -> Option<&SqlitePool> {
        None
    }

    fn as_mysql(&self) -> Option<&MySqlPool> {
        Some(&self.pool)
    }
}

/// Type alias for a shared database pool
pub type DynDatabasePool = Arc<dyn DatabasePool>;

/// Create a database connection pool based on configuration.
///
/// # Errors
///
/// Returns an error if the table prefix is not a plain identifier or the
/// connection cannot be established.
///
/// # Example
///
/// ```ignore
/// use blogger::config::DatabaseConfig;
/// use blogger::db::create_pool;
///
/// let config = DatabaseConfig::default();
/// let pool = create_pool(&config).await?;
/// pool.ping().await?;
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> Result<DynDatabasePool> {
    let pool: DynDatabasePool = match config.driver {
        DatabaseDriver::Sqlite => {
            Arc::new(SqliteDatabase::new(&config.url, &config.table_prefix).await?)
        }
        DatabaseDriver::Mysql => {
            Arc::new(MysqlDatabase::new(&config.url, &config.table_prefix).await?)
        }
    };

    tracing::info!(
        "Database connected: {:?} (table prefix '{}')",
        config.driver,
        config.table_prefix
    );

    Ok(pool)
}

/// Create a SQLite in-memory database pool for testing
pub async fn create_test_pool() -> Result<DynDatabasePool> {
    let config = DatabaseConfig {
        driver: DatabaseDriver::Sqlite,
        url: ":memory:".to_string(),
        table_prefix: "rex_".to_string(),
    };
    create_pool(&config).await
}

/// Borrow the SQLite pool of a connection whose driver reported SQLite
pub(crate) fn sqlite_pool(pool: &DynDatabasePool) -> Result<&SqlitePool> {
    pool.as_sqlite()
        .context("Database driver reported SQLite but no SQLite pool is available")
}

/// Borrow the MySQL pool of a connection whose driver reported MySQL
pub(crate) fn mysql_pool(pool: &DynDatabasePool) -> Result<&MySqlPool> {
    pool.as_mysql()
        .context("Database driver reported MySQL but no MySQL pool is available")
}
