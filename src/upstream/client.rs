//! Shared JSON-over-HTTP client for upstream providers.

use std::time::Duration;

use reqwest::{header::HeaderMap, header::HeaderValue, Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::error::UpstreamError;

/// Header used to send provider API keys.
pub const API_KEY_HEADER: &str = "x-api-key";

// == Upstream Client ==
/// Base URL, optional API key and a timeout-bounded reqwest client.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Builds a client for `base_url`. `api_key`, if any, is sent on every call.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|_| UpstreamError::Payload("API key is not a valid header".into()))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// `GET <base><path>?<query>` and decodes the JSON body.
    ///
    /// # Arguments
    /// * `path` - Path below the base URL, starting with `/`
    /// * `query` - Query pairs, encoded by `Url::parse_with_params`
    ///
    /// # Returns
    /// The decoded body, `UpstreamError::Status` for a non-2xx reply carrying
    /// the body text, or `UpstreamError::Transport` if the call never completed.
    ///
    /// Path segments in `path` must already be escaped with `urlencoding::encode`.
    pub async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        let url = if query.is_empty() {
            Url::parse(&url)
        } else {
            Url::parse_with_params(&url, query)
        }
        .map_err(|e| UpstreamError::Payload(format!("invalid upstream url: {}", e)))?;

        debug!(url = %url.path(), "upstream request");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Pulls `field` out of an upstream object, failing if it is missing.
pub fn take_field(mut body: Value, field: &str) -> Result<Value, UpstreamError> {
    body.get_mut(field)
        .map(Value::take)
        .ok_or_else(|| UpstreamError::Payload(format!("missing field `{}`", field)))
}
