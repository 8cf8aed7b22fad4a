//! Category repository
//!
//! Database operations for categories.
//!
//! This module provides:
//! - `CategoryRepository` trait defining the interface for category data access
//! - `SqlxCategoryRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::pool::{mysql_pool, sqlite_pool};
use crate::db::{DynDatabasePool, CATEGORIES_TABLE};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Category repository trait
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Every distinct category name, sorted by name
    async fn list_names(&self) -> Result<Vec<String>>;
}

/// SQLx-based category repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxCategoryRepository {
    pool: DynDatabasePool,
}

impl SqlxCategoryRepository {
    /// Create a new SQLx category repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn list_names(&self) -> Result<Vec<String>> {
        let table = self.pool.table(CATEGORIES_TABLE);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_category_names_sqlite(sqlite_pool(&self.pool)?, &table).await
            }
            DatabaseDriver::Mysql => {
                list_category_names_mysql(mysql_pool(&self.pool)?, &table).await
            }
        }
    }
}

async fn list_category_names_sqlite(pool: &SqlitePool, table: &str) -> Result<Vec<String>> {
    let sql = format!("SELECT DISTINCT name FROM {} ORDER BY name", table);
    let rows = sqlx::query(&sql)
        .fetch_all(pool)
        .await
        .context("Failed to list categories")?;

    let mut names = Vec::with_capacity(rows.len());
    for row in rows {
        names.push(row.try_get("name")?);
    }

    tracing::debug!("Listed {} categories", names.len());
    Ok(names)
}

async fn list_category_names_mysql(pool: &MySqlPool, table: &str) -> Result<Vec<String>> {
    let sql = format!("SELECT DISTINCT name FROM {} ORDER BY name", table);
    let rows = sqlx::query(&sql)
        .fetch_all(pool)
        .await
        .context("Failed to list categories")?;

    let mut names = Vec::with_capacity(rows.len());
    for row in rows {
        names.push(row.try_get("name")?);
    }

    tracing::debug!("Listed {} categories", names.len());
    Ok(names)
}
