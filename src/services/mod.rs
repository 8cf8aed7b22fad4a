//! Services layer
//!
//! `BloggerService` is the entry point the host CMS calls. It wraps the
//! repositories and maps their failures to `BloggerError`.

pub mod blogger;

pub use blogger::{BloggerError, BloggerService};
