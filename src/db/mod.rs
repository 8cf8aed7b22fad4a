//! Database layer
//!
//! This module provides database access for the blogger add-on.
//! It supports:
//! - SQLite (tests and small installations)
//! - MySQL (the usual host CMS database)
//!
//! The database driver is selected based on configuration.
//!
//! # Architecture
//!
//! The database layer uses a trait-based abstraction (`DatabasePool`) that
//! allows the repositories to work with either SQLite or MySQL without
//! knowing the specific backend. The pool also carries the table prefix of
//! the host CMS (`rex_` by default), so `pool.table("blogger_entries")`
//! yields the fully qualified table name.
//!
//! The blogger tables are owned by the host CMS; this crate only reads them.
//!
//! # Usage
//!
//! ```ignore
//! use blogger::config::DatabaseConfig;
//! use blogger::db::{create_pool, repositories::SqlxEntryRepository};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! let entries = SqlxEntryRepository::new(pool.clone());
//! ```

pub mod pool;
pub mod repositories;

#[cfg(test)]
pub(crate) mod fixtures;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};

/// Table holding blog entries and their translations
pub const ENTRIES_TABLE: &str = "blogger_entries";
/// Table holding category labels
pub const CATEGORIES_TABLE: &str = "blogger_categories";
/// Table holding tag labels
pub const TAGS_TABLE: &str = "blogger_tags";
