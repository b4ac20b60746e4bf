//! Rate-limited critical-quality alerts.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

use crate::domain::Clock;
use crate::notify::{NotificationError, PushNotifier};

/// Default minimum time between two alerts.
pub const DEFAULT_ALERT_COOLDOWN: TimeDelta = TimeDelta::seconds(3600);

/// Default bound on a single dispatch.
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends at most one push alert per cooldown window.
///
/// The cooldown slot is claimed under the lock before dispatching, so two
/// concurrent critical analyses produce a single alert. Dispatch errors
/// and timeouts are logged and swallowed.
#[derive(Debug)]
pub struct AlertNotifier {
    notifier: Arc<dyn PushNotifier>,
    target: String,
    clock: Arc<dyn Clock>,
    cooldown: TimeDelta,
    timeout: Duration,
    last_alert_at: Mutex<Option<DateTime<Utc>>>,
}

impl AlertNotifier {
    /// Creates a notifier with the default cooldown and timeout.
    #[must_use]
    pub fn new(
        notifier: Arc<dyn PushNotifier>,
        target: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            notifier,
            target: target.into(),
            clock,
            cooldown: DEFAULT_ALERT_COOLDOWN,
            timeout: DEFAULT_NOTIFY_TIMEOUT,
            last_alert_at: Mutex::new(None),
        }
    }

    /// Overrides the cooldown window.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: TimeDelta) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Overrides the dispatch timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Dispatches an alert unless one went out within the cooldown.
    ///
    /// Returns `true` when a dispatch was attempted.
    pub async fn maybe_alert(&self, message: &str, issues: &[String]) -> bool {
        {
            let mut last = self.last_alert_at.lock().await;
            let now = self.clock.now();
            if let Some(prev) = *last
                && now - prev <= self.cooldown
            {
                tracing::debug!(since = %prev, "alert suppressed by cooldown");
                return false;
            }
            *last = Some(now);
        }

        let text = compose(message, issues);
        match self.dispatch(&text).await {
            Ok(()) => tracing::info!(issues = issues.len(), "critical alert dispatched"),
            Err(e) => tracing::warn!(error = %e, "critical alert dispatch failed"),
        }
        true
    }

    async fn dispatch(&self, text: &str) -> Result<(), NotificationError> {
        tokio::time::timeout(self.timeout, self.notifier.send(&self.target, text))
            .await
            .map_err(|_| NotificationError::Timeout(self.timeout))?
    }
}

/// Builds the alert text: header, status message, one line per issue.
fn compose(message: &str, issues: &[String]) -> String {
    let mut text = format!("[AquaSense] Water quality alert\n{message}");
    for issue in issues {
        let _ = write!(text, "\n- {issue}");
    }
    text
}
