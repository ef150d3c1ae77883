// src/models/mod.rs

//! Domain models for the watcher application.

mod config;
mod listing;

// Re-export all public types
pub use config::{ConfigFile, FetchConfig, FilterScalar, FilterValue, WatchConfig};
pub use listing::Listing;
