//! Outbound push notifications.
//!
//! [`PushNotifier`] is the single seam the alerting path depends on. The
//! gateway ships a LINE Messaging API sender and a log-only fallback used
//! when no channel token is configured.

pub mod line;

use std::fmt;

use async_trait::async_trait;

pub use line::LineNotifier;

/// Notification dispatch failure. Always logged, never surfaced to API
/// callers.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// The request never reached the provider.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider rejected message ({status}): {body}")]
    Rejected {
        /// HTTP status returned by the provider.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// Dispatch did not finish within the configured bound.
    #[error("dispatch timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Sends a text message to a recipient.
#[async_trait]
pub trait PushNotifier: Send + Sync + fmt::Debug {
    /// Delivers `text` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] when the message could not be delivered.
    async fn send(&self, target: &str, text: &str) -> Result<(), NotificationError>;
}

/// Notifier that only writes the alert to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl PushNotifier for LogNotifier {
    async fn send(&self, target: &str, text: &str) -> Result<(), NotificationError> {
        tracing::warn!(target_id = target, text, "push channel not configured; alert logged only");
        Ok(())
    }
}
