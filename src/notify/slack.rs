//! Slack Web API transport (`chat.postMessage`).

use super::{Message, Notifier};
use crate::error::DeliveryError;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use url::Url;

#[derive(Deserialize)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
}

pub struct SlackNotifier {
    client: Client,
    endpoint: Url,
    token: String,
}

impl SlackNotifier {
    /// `api_url` is the API base, e.g. `https://slack.com/api/`.
    pub fn new(api_url: &Url, token: &str, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("certwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(SlackNotifier {
            client,
            endpoint: api_url.join("chat.postMessage")?,
            token: token.to_string(),
        })
    }
}

impl Notifier for SlackNotifier {
    fn send(&self, channel: &str, message: &Message) -> Result<(), DeliveryError> {
        let payload = json!({
            "channel": channel,
            "text": message.text,
            "blocks": message.blocks,
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status {
                code: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let reply: PostMessageResponse = response.json()?;
        if reply.ok {
            Ok(())
        } else {
            Err(DeliveryError::Api(
                reply.error.unwrap_or_else(|| "unknown_error".to_string()),
            ))
        }
    }
}
