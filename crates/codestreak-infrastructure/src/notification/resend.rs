use async_trait::async_trait;
use log::info;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use codestreak_domain::notification::{NotificationMessage, NotificationSender};
use codestreak_domain::shared::DomainError;

use super::message_builder::render;

const RESEND_TEST_DOMAIN: &str = "resend.dev";

/// Sender address for a configured sending domain.
///
/// Without a verified domain Resend only accepts its own onboarding sender.
pub fn from_address_for_domain(domain: Option<&str>) -> String {
    match domain.map(str::trim).filter(|d| !d.is_empty()) {
        None | Some(RESEND_TEST_DOMAIN) => format!("onboarding@{}", RESEND_TEST_DOMAIN),
        Some(domain) => format!("LeetCode Reminder <noreply@{}>", domain),
    }
}

/// Email sender backed by the Resend HTTP API
pub struct ResendEmailSender {
    api_key: String,
    from_address: String,
    base_url: String,
    client: Client,
}

impl ResendEmailSender {
    pub fn new(
        api_key: String,
        from_address: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::Infrastructure(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            api_key,
            from_address,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_emails_url(&self) -> String {
        format!("{}/emails", self.base_url)
    }

    fn build_payload(&self, message: &NotificationMessage) -> serde_json::Value {
        let email = render(message);
        json!({
            "from": self.from_address,
            "to": [message.recipient],
            "subject": email.subject,
            "html": email.html,
            "text": email.text,
        })
    }
}

#[async_trait]
impl NotificationSender for ResendEmailSender {
    async fn send(&self, message: &NotificationMessage) -> Result<(), DomainError> {
        let response = self
            .client
            .post(self.build_emails_url())
            .bearer_auth(&self.api_key)
            .json(&self.build_payload(message))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::Timeout(format!("Resend request: {}", e))
                } else {
                    DomainError::Dispatch(format!("Failed to send email via Resend: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::Dispatch(format!(
                "Resend API failed with status {}: {}",
                status, body
            )));
        }

        // Resend returns {"id": "..."} for accepted emails
        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let id = body.get("id").and_then(|v| v.as_str()).unwrap_or("unknown");

        info!(
            "📧 {} email accepted by Resend for {} (id: {})",
            message.kind().as_str(),
            message.recipient,
            id
        );
        Ok(())
    }

    fn channel_name(&self) -> &'static str {
        "resend"
    }
}
