//! LINE Messaging API push sender.

use async_trait::async_trait;
use serde::Serialize;

use super::{NotificationError, PushNotifier};

/// Push endpoint of the LINE Messaging API.
pub const LINE_PUSH_URL: &str = "https://api.line.me/v2/bot/message/push";

#[derive(Debug, Serialize)]
struct PushBody<'a> {
    to: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

/// Sends alerts as LINE text messages.
#[derive(Debug, Clone)]
pub struct LineNotifier {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl LineNotifier {
    /// Creates a sender for the public LINE endpoint.
    #[must_use]
    pub fn new(client: reqwest::Client, access_token: impl Into<String>) -> Self {
        Self::with_endpoint(client, LINE_PUSH_URL, access_token)
    }

    /// Creates a sender for a custom endpoint (proxies, test servers).
    #[must_use]
    pub fn with_endpoint(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl PushNotifier for LineNotifier {
    async fn send(&self, target: &str, text: &str) -> Result<(), NotificationError> {
        let body = PushBody {
            to: target,
            messages: [TextMessage { kind: "text", text }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(target_id = target, "LINE alert sent");
        Ok(())
    }
}
