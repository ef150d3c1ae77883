//! Page source capability.
//!
//! The poll cycle only needs "give me the current page HTML again"; the
//! transport behind that is pluggable so tests can serve canned documents.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::FetchConfig;

/// Capability that can re-fetch the watched search page.
///
/// Protocol-level failures surface as [`AppError::Transport`], which the
/// recovery policy treats as transient.
#[async_trait]
pub trait PageSource: Send {
    /// Reload the page and return its raw HTML.
    async fn refresh(&mut self) -> Result<String>;
}

/// HTTP-backed page source for a fixed search URL.
pub struct HttpPageSource {
    client: reqwest::Client,
    url: String,
}

impl HttpPageSource {
    /// Create a page source for the given search URL.
    pub fn new(config: &FetchConfig, url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(AppError::transport)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// The URL this source fetches.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn refresh(&mut self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(AppError::transport)?;

        let response = response.error_for_status().map_err(AppError::transport)?;

        response.text().await.map_err(AppError::transport)
    }
}
