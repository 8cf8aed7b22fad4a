//! Database repositories
//!
//! Repository pattern implementations for the blogger tables.
//! Each repository handles the read queries of one table.

pub mod category;
pub mod entry;
pub mod tag;

pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use entry::{EntryRepository, SqlxEntryRepository};
pub use tag::{SqlxTagRepository, TagRepository};
