#![doc = "Mail integration for the CLI: the SendGrid-backed implementation of the core `Mailer` trait."]
//
//! # Mailer Integration (CLI <-> Core)
//!
//! [`SendGridMailer`] translates a core [`MailMessage`] into a SendGrid v3
//! `mail/send` request. The API key is handed over at construction; nothing in
//! this module reads the environment.
//!
//! - Template messages carry `template_id` plus `dynamic_template_data`.
//! - Literal messages carry `subject` and a `text/plain` content part.
//! - Any non-2xx answer becomes [`MailError::Rejected`] with the provider's body.

use async_trait::async_trait;
use codersnack_core::contract::{MailMessage, Mailer};
use codersnack_core::error::MailError;
use reqwest::Client;
use serde_json::{json, Value};

pub const SENDGRID_BASE_URL: &str = "https://api.sendgrid.com";

pub struct SendGridMailer {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SendGridMailer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, SENDGRID_BASE_URL)
    }

    /// Point the mailer at another host (a sandbox or a local test server).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let api_key = api_key.into();
        tracing::info!(
            api_key_set = !api_key.is_empty(),
            "Initialized SendGridMailer"
        );
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }
}

/// Request body for SendGrid's `POST /v3/mail/send`.
pub fn sendgrid_body(message: &MailMessage) -> Value {
    let mut personalization = json!({ "to": [{ "email": message.to }] });
    if !message.dynamic_template_data.is_empty() {
        personalization["dynamic_template_data"] =
            Value::Object(message.dynamic_template_data.clone());
    }

    let mut body = json!({
        "personalizations": [personalization],
        "from": { "email": message.from },
    });
    if let Some(template_id) = &message.template_id {
        body["template_id"] = Value::String(template_id.clone());
    }
    if let Some(subject) = &message.subject {
        body["subject"] = Value::String(subject.clone());
    }
    if let Some(text) = &message.text {
        body["content"] = json!([{ "type": "text/plain", "value": text }]);
    }
    body
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            template_id = message.template_id.as_deref().unwrap_or("-"),
            "Sending email through SendGrid"
        );
        let url = format!("{}/v3/mail/send", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&sendgrid_body(message))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, "Mail transport error");
                MailError::Transport(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(status = %status, "SendGrid accepted message");
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
        tracing::error!(status = %status, body = %body, "SendGrid rejected message");
        Err(MailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> MailMessage {
        let mut data = serde_json::Map::new();
        data.insert("title".into(), Value::String("Closures".into()));
        MailMessage {
            to: "reader@example.com".into(),
            from: "admin@example.com".into(),
            template_id: Some("d-1".into()),
            subject: None,
            text: None,
            dynamic_template_data: data,
        }
    }

    #[test]
    fn template_message_body() {
        let body = sendgrid_body(&message());
        assert_eq!(
            body,
            json!({
                "personalizations": [{
                    "to": [{ "email": "reader@example.com" }],
                    "dynamic_template_data": { "title": "Closures" }
                }],
                "from": { "email": "admin@example.com" },
                "template_id": "d-1"
            })
        );
    }

    #[test]
    fn literal_message_body() {
        let literal = MailMessage {
            template_id: None,
            subject: Some("Hello".into()),
            text: Some("plain body".into()),
            dynamic_template_data: serde_json::Map::new(),
            ..message()
        };
        let body = sendgrid_body(&literal);
        assert_eq!(body["subject"], "Hello");
        assert_eq!(body["content"][0]["type"], "text/plain");
        assert_eq!(body["content"][0]["value"], "plain body");
        assert!(body.get("template_id").is_none());
        assert!(body["personalizations"][0]
            .get("dynamic_template_data")
            .is_none());
    }
}
