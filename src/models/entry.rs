//! Entry model
//!
//! This module defines `Entry`, one blog post or one translation of a post,
//! as read from the blogger entries table joined with its category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    /// Unique identifier
    pub id: i64,
    /// Article the entry belongs to; translations share it with the original
    pub aid: i64,
    /// Whether this row is a translation of another entry
    pub translation: bool,
    /// Language id of the host CMS
    pub clang: i64,
    /// Category name, `None` when the category reference does not resolve
    pub category: Option<String>,
    /// Teaser text
    pub preview: String,
    /// Title
    pub headline: String,
    /// Body
    pub content: String,
    /// Media list reference of the entry's gallery
    pub gallery: Option<String>,
    /// Resolved tag labels
    pub tags: Vec<String>,
    /// Hidden from public listings
    pub offline: bool,
    /// Publication timestamp
    pub posted_at: DateTime<Utc>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Whether the entry may appear in public listings
    pub fn is_visible(&self) -> bool {
        !self.offline
    }

    /// Whether one of the entry's tags equals `name`
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }
}
