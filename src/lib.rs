//! Blogger - blog entry queries for the CMS blogger add-on
//!
//! This library reads blog entries, tags, categories and archive months
//! from the blogger tables of a host CMS database.

pub mod config;
pub mod db;
pub mod models;
pub mod services;

pub use models::{Entry, MonthBucket};
pub use services::blogger::{BloggerError, BloggerService};
