// src/main.rs

//! clwatch: craigslist search watcher CLI
//!
//! Polls a search page on a jittered interval, diffs listings against the
//! persisted dedup index, and notifies on new ones until stopped.

use std::path::PathBuf;

use clap::Parser;

use clwatch::config::load_watch_config;
use clwatch::error::Result;
use clwatch::pipeline::{DedupIndex, run_watch};
use clwatch::services::{HttpPageSource, WebhookNotifier};
use clwatch::utils::{build_search_url, log};

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(name = "clwatch", version, about = "Craigslist search watcher")]
struct Cli {
    /// TOML file defining the search (one table per mode)
    config: PathBuf,

    /// Mode name within the config file (optional for single-mode files)
    #[arg(short, long)]
    mode: Option<String>,

    /// Suppress per-cycle output
    #[arg(short, long)]
    quiet: bool,
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    log::init(if cli.quiet { "warn" } else { "info" });

    let (config, mode) = load_watch_config(&cli.config, cli.mode.as_deref())?;

    let link = build_search_url(
        &config.locale,
        &config.category,
        config.sublocale.as_deref(),
        config.direct_link.as_deref(),
        &config.search_filters,
    )?;

    log::header(&format!("watching '{}' (mode: {})", config.name, mode));
    log::info(&format!("link: {}", link));
    if config.direct_link.is_some() {
        log::info("using direct link; locale/category/filters ignored");
    } else {
        log::info("search parameters:");
        log::sub_item(&format!("{:>12} = {}", "locale", config.locale));
        log::sub_item(&format!("{:>12} = {}", "category", config.category));
        for (tag, value) in &config.search_filters {
            log::sub_item(&format!("{:>12} = {}", tag, value.values().join(", ")));
        }
    }

    let index = DedupIndex::new(config.index_path(&cli.config, &mode));
    log::info(&format!("dedup index: {}", index.path().display()));

    let mut source = HttpPageSource::new(&config.fetch, link)?;
    let mut notifier = WebhookNotifier::new(&config.webhook_url);

    run_watch(&config, &mut source, &mut notifier, &index).await
}
