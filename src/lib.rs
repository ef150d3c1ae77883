// src/lib.rs

//! clwatch: craigslist search watcher

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
