//! Daily reminder: fetch one random snack and mail it.
//!
//! The handler is shaped like a serverless function: it takes an HTTP-style
//! request (query parameters only) and returns a status code plus JSON body.
//! Exactly one fetch and at most one send happen per invocation; nothing is
//! retried.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::config::ReminderConfig;
use crate::contract::{ContentApi, MailMessage, Mailer, SnackResponse};
use crate::fetch::fetch_random_snack;

/// Trigger surface: the query string of the invoking request.
#[derive(Debug, Clone, Default)]
pub struct ReminderRequest {
    pub query: BTreeMap<String, String>,
}

impl ReminderRequest {
    pub fn for_category(category: impl Into<String>) -> Self {
        let mut query = BTreeMap::new();
        query.insert("category".to_owned(), category.into());
        Self { query }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub status_code: u16,
    pub body: Value,
}

impl ReminderResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    fn failure(error: String) -> Self {
        Self {
            status_code: 500,
            body: json!({ "error": error }),
        }
    }
}

/// Build the templated reminder email for one snack.
pub fn build_message(config: &ReminderConfig, response: &SnackResponse) -> MailMessage {
    let snack = &response.snack;
    let category = &response.category;

    let mut data = serde_json::Map::new();
    data.insert(
        "subject".into(),
        Value::String(format!("{} [Codersnack Daily Reminder]", snack.header)),
    );
    data.insert("name".into(), Value::String(config.sender_name.clone()));
    data.insert("snack-id".into(), Value::String(snack.id.to_string()));
    data.insert("title".into(), Value::String(snack.header.clone()));
    data.insert("url".into(), Value::String(snack.weblink.clone()));
    data.insert("category".into(), Value::String(category.header.clone()));
    data.insert("category-key".into(), Value::String(category.key.clone()));

    MailMessage {
        to: config.to.clone(),
        from: config.from.clone(),
        template_id: Some(config.template_id.clone()),
        subject: None,
        text: None,
        dynamic_template_data: data,
    }
}

/// Plain-text variant: the fetched snack is mailed as raw JSON under a
/// literal subject, without the provider template.
pub fn build_raw_message(
    config: &ReminderConfig,
    response: &SnackResponse,
    subject: &str,
) -> MailMessage {
    MailMessage {
        to: config.to.clone(),
        from: config.from.clone(),
        template_id: None,
        subject: Some(subject.to_owned()),
        text: Some(serde_json::to_string(response).unwrap_or_default()),
        dynamic_template_data: serde_json::Map::new(),
    }
}

fn requested_category<'a>(config: &'a ReminderConfig, request: &'a ReminderRequest) -> &'a str {
    request
        .query
        .get("category")
        .map(String::as_str)
        .unwrap_or(config.default_category.as_str())
}

async fn fetch_for_request<A>(
    api: &A,
    config: &ReminderConfig,
    request: &ReminderRequest,
) -> Result<SnackResponse, ReminderResponse>
where
    A: ContentApi + ?Sized,
{
    let category = requested_category(config, request);
    info!(category = %category, "Reminder invoked");

    fetch_random_snack(api, &config.endpoint, category)
        .await
        .map_err(|e| {
            error!(error = %e, category = %category, "Failed to fetch random snack");
            ReminderResponse::failure(format!("Error fetching snack {e}"))
        })
}

pub async fn handle_reminder<A, M>(
    api: &A,
    mailer: &M,
    config: &ReminderConfig,
    request: &ReminderRequest,
) -> ReminderResponse
where
    A: ContentApi + ?Sized,
    M: Mailer + ?Sized,
{
    let snack = match fetch_for_request(api, config, request).await {
        Ok(snack) => snack,
        Err(response) => return response,
    };

    let message = build_message(config, &snack);
    match mailer.send(&message).await {
        Ok(()) => {
            info!(snack_id = snack.snack.id, to = %message.to, "Reminder email sent");
            let mut body = serde_json::to_value(&message).unwrap_or_else(|_| json!({}));
            if let Value::Object(map) = &mut body {
                map.insert("message".into(), Value::String("Email has been sent".into()));
            }
            ReminderResponse {
                status_code: 200,
                body,
            }
        }
        Err(e) => {
            error!(error = %e, snack_id = snack.snack.id, "Failed to send reminder email");
            ReminderResponse::failure(format!("Error sending email {e}"))
        }
    }
}

/// Like [`handle_reminder`], but sends [`build_raw_message`] and answers with
/// only the confirmation message.
pub async fn handle_raw_reminder<A, M>(
    api: &A,
    mailer: &M,
    config: &ReminderConfig,
    request: &ReminderRequest,
    subject: &str,
) -> ReminderResponse
where
    A: ContentApi + ?Sized,
    M: Mailer + ?Sized,
{
    let snack = match fetch_for_request(api, config, request).await {
        Ok(snack) => snack,
        Err(response) => return response,
    };

    let message = build_raw_message(config, &snack, subject);
    match mailer.send(&message).await {
        Ok(()) => {
            info!(snack_id = snack.snack.id, to = %message.to, "Raw reminder email sent");
            ReminderResponse {
                status_code: 200,
                body: json!({ "message": "Email has been sent" }),
            }
        }
        Err(e) => {
            error!(error = %e, snack_id = snack.snack.id, "Failed to send raw reminder email");
            ReminderResponse::failure(format!("Error sending email {e}"))
        }
    }
}
