//! Utility functions and helpers.

pub mod log;
pub mod url;

pub use url::{build_search_url, insert_tag};
