//! HTTP side of the content API: the reqwest-backed [`ContentApi`], URL
//! building for paginated CMS queries and the random-snack lookup used by the
//! reminder.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, error, info};

use crate::contract::{ContentApi, SnackEnvelope, SnackResponse};
use crate::error::FetchError;

/// [`ContentApi`] over a shared `reqwest::Client` with the client defaults
/// (no custom timeout, no retry).
#[derive(Clone, Default)]
pub struct HttpContentApi {
    client: Client,
}

impl HttpContentApi {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentApi for HttpContentApi {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        info!(url = %url, "Fetching content API");

        let response = self.client.get(url).send().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to reach content API");
            FetchError::Transport {
                url: url.to_owned(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %url, "Content API returned error status");
            return Err(FetchError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let value = response.json::<serde_json::Value>().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to parse content API JSON");
            FetchError::Decode {
                url: url.to_owned(),
                message: e.to_string(),
            }
        })?;
        debug!(url = %url, "Content API response decoded");
        Ok(value)
    }
}

/// Join `base_url` and `path`, then append the `_limit` pagination override.
///
/// The separator depends on whether `path` already carries a query string.
pub fn with_page_limit(base_url: &str, path: &str, limit: Option<u32>) -> String {
    let mut url = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    if let Some(limit) = limit {
        let separator = if path.contains('?') { '&' } else { '?' };
        url.push(separator);
        url.push_str(&format!("_limit={limit}"));
    }
    url
}

fn category_key_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").ok())
        .as_ref()
}

/// True when `key` can be placed in a query string without escaping.
pub fn is_valid_category_key(key: &str) -> bool {
    category_key_pattern().is_some_and(|re| re.is_match(key))
}

/// Fetch one random snack of `category` from the random-snack `endpoint`.
pub async fn fetch_random_snack<A>(
    api: &A,
    endpoint: &str,
    category: &str,
) -> Result<SnackResponse, FetchError>
where
    A: ContentApi + ?Sized,
{
    if !is_valid_category_key(category) {
        error!(category = %category, "Refusing to query with an invalid category key");
        return Err(FetchError::InvalidCategory(category.to_owned()));
    }

    let url = format!("{endpoint}?category={category}&entity=snack");
    let body = api.get_json(&url).await?;
    let envelope: SnackEnvelope = serde_json::from_value(body).map_err(|e| {
        error!(error = ?e, url = %url, "Random snack response has unexpected shape");
        FetchError::Decode {
            url: url.clone(),
            message: e.to_string(),
        }
    })?;

    info!(
        snack_id = envelope.codersnack.id,
        category = %envelope.codersnacks_category.key,
        "Fetched random snack"
    );
    Ok(envelope.into())
}
