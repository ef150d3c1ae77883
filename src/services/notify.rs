//! Notification dispatch for newly discovered listings.

use async_trait::async_trait;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::Listing;

/// Display template for one listing line in a notification.
const LINE_TEMPLATE: &str = "{title} | ${price} | {location} | {posted_at}\n{url}";

/// Pluggable notification backend.
///
/// Auth and connection failures surface as
/// [`AppError::NotifierDisconnected`]; the recovery policy responds by
/// calling [`Notifier::reconnect`] and retrying the batch later.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a notification for a batch of new listings.
    async fn send(&self, listings: &[Listing], subject: &str) -> Result<()>;

    /// Re-establish the underlying connection after a disconnect.
    async fn reconnect(&mut self) -> Result<()>;
}

/// Build the subject line for a batch of new listings.
pub fn subject_line(count: usize, search_name: &str) -> String {
    format!("{} NEW {} FOUND", count, search_name.to_uppercase())
}

/// Webhook notification backend posting a JSON payload.
pub struct WebhookNotifier {
    webhook_url: String,
    http: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Render the message body: one block per listing.
    fn body(listings: &[Listing]) -> String {
        listings
            .iter()
            .map(|listing| listing.format(LINE_TEMPLATE))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, listings: &[Listing], subject: &str) -> Result<()> {
        let payload = json!({
            "text": format!("*{}*\n\n{}", subject, Self::body(listings)),
            "unfurl_links": false,
        });

        let response = self
            .http
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(AppError::disconnected)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::disconnected(format!(
                "webhook returned {status}: {body}"
            )));
        }

        Ok(())
    }

    async fn reconnect(&mut self) -> Result<()> {
        // The webhook is stateless; a fresh client drops any poisoned
        // connection pool entries.
        self.http = reqwest::Client::new();
        Ok(())
    }
}

/// No-op notification backend for testing.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, _listings: &[Listing], _subject: &str) -> Result<()> {
        Ok(())
    }

    async fn reconnect(&mut self) -> Result<()> {
        Ok(())
    }
}
