//! Data models
//!
//! This module contains the data structures handed to the host CMS
//! templating layer:
//! - `Entry`, one blog post or translation
//! - `MonthBucket`, one archive month
//! - tag reference parsing for the delimited tag id column

mod entry;
mod month;
mod tag;

pub use entry::Entry;
pub use month::MonthBucket;
pub use tag::{parse_tag_ids, TagIds, DEFAULT_TAG_DELIMITER};
