// src/services/mod.rs

//! External capability boundaries: page fetching, listing extraction, and
//! notification dispatch.

pub mod extract;
pub mod notify;
pub mod page;

pub use extract::{Layout, extract_listings};
pub use notify::{Notifier, NoopNotifier, WebhookNotifier, subject_line};
pub use page::{HttpPageSource, PageSource};
