//! Outbound notifications.
//!
//! Notifications are fire-and-forget: [`dispatch_detached`] hands the message
//! to a background task and returns immediately. Delivery failures are
//! logged and never reach the request that triggered them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error("relay rejected notification with status {0}")]
    Rejected(u16),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// An email-style message to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Tells a PI that a review of their proposal arrived.
    pub fn review_received(to: impl Into<String>, proposal_title: &str) -> Self {
        Self::new(
            to,
            format!("New review for \"{}\"", proposal_title),
            format!(
                "A reviewer has submitted an assessment of your proposal \"{}\". \
                 Reviews become visible once the program releases results.",
                proposal_title
            ),
        )
    }
}

/// Delivers notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes notifications to the log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(to = %notification.to, subject = %notification.subject, "Notification");
        Ok(())
    }
}

/// Posts notifications as JSON to an email relay.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Creates a notifier posting to `url` with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }
        debug!(to = %notification.to, "Notification relayed");
        Ok(())
    }
}

/// Sends `notification` on a background task.
///
/// Must be called from within a tokio runtime. The returned handle may be
/// ignored; failures are logged with `warn!`.
pub fn dispatch_detached(
    notifier: Arc<dyn Notifier>,
    notification: Notification,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(&notification).await {
            warn!(
                to = %notification.to,
                subject = %notification.subject,
                error = %e,
                "Failed to deliver notification"
            );
        }
    })
}
