//! # contract: data model and collaborator seams
//!
//! Plain data types for what the codersnack CMS returns, plus the two traits
//! the pipelines talk through:
//! - [`ContentApi`]: one JSON GET against the CMS or the random-snack function.
//! - [`Mailer`]: the email dispatch collaborator.
//!
//! Both traits are annotated for `mockall`, so tests (and downstream crates with
//! the `test-export-mocks` feature) get `MockContentApi` and `MockMailer`.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{FetchError, MailError};

/// The CMS sends `null` for empty text fields; treat those as "".
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A named grouping of snacks, identified by its URL-safe `key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    /// Display name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub header: String,
    pub key: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image_url: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A single unit of content ("snack").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: i64,
    /// Title.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub header: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Body text, Markdown.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub explanation: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub featured_image_url: String,
    /// Destination link of the snack on the published site.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub weblink: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub references: String,
}

/// Association record linking one snack to its category, as served by
/// `/codersnacks-asoc-snack-categories` and the random-snack function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnackEnvelope {
    pub id: i64,
    pub codersnack: ContentItem,
    pub codersnacks_category: Category,
}

/// The reminder's view of one randomly picked snack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnackResponse {
    pub id: i64,
    pub snack: ContentItem,
    pub category: Category,
}

impl From<SnackEnvelope> for SnackResponse {
    fn from(envelope: SnackEnvelope) -> Self {
        SnackResponse {
            id: envelope.id,
            snack: envelope.codersnack,
            category: envelope.codersnacks_category,
        }
    }
}

/// A structured email, either template driven or with a literal subject/text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailMessage {
    pub to: String,
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Substitution fields for the provider-side template.
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub dynamic_template_data: serde_json::Map<String, serde_json::Value>,
}

/// Read-only access to the remote content API.
///
/// Implementors issue exactly one GET per call. No retries.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Fetch `url` and parse the body as JSON.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;
}

/// Email dispatch collaborator. Credentials are the implementor's concern and
/// are supplied when it is constructed.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message. Any transport error or non-2xx answer is an `Err`.
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}
