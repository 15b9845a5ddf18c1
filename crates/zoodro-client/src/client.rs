//! HTTP client for the vendor API.
//!
//! Wraps `reqwest` with bounding-box query construction, status checking
//! and envelope validation. Requests are never retried here: the next map
//! movement issues a fresh request anyway.

use std::time::Duration;

use reqwest::{Client, Url};
use zoodro_core::{AppConfig, ViewportBounds};

use crate::error::ClientError;
use crate::types::{parse_vendor_envelope, VendorBatch};

const DEFAULT_BASE_URL: &str = "https://zooodro-be-go.liara.run/";
const DEFAULT_USER_AGENT: &str = "zoodro/0.1 (vendor-map)";

/// Client for the vendor API's `GET /vendors` endpoint.
///
/// Use [`VendorClient::new`] for production or
/// [`VendorClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct VendorClient {
    client: Client,
    vendors_url: Url,
}

impl VendorClient {
    /// Creates a new client pointed at the production vendor API.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`VendorClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let user_agent = if config.user_agent.is_empty() {
            DEFAULT_USER_AGENT
        } else {
            &config.user_agent
        };
        Self::with_base_url(config.request_timeout_secs, user_agent, &config.api_base_url)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// The endpoint is resolved relative to the base, so a base with a path
    /// prefix (`https://host/api`) targets `https://host/api/vendors`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not a valid absolute URL.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so joining keeps any path prefix.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };
        let base = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base".to_owned()));
        }
        let vendors_url = base.join("vendors").map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            vendors_url,
        })
    }

    /// Fetches the vendors inside `bounds`.
    ///
    /// Only the top-left and bottom-right corners go on the wire; together
    /// they fully determine the axis-aligned box.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ClientError::Deserialize`] if the body is not JSON.
    /// - [`ClientError::MalformedEnvelope`] if the body has no `vendors` array.
    pub async fn fetch_vendors(&self, bounds: &ViewportBounds) -> Result<VendorBatch, ClientError> {
        let url = self.build_url(bounds);
        let body = self.request_json(&url).await?;
        let batch = parse_vendor_envelope(body, url.as_str())?;
        tracing::debug!(
            vendors = batch.len(),
            skipped = batch.skipped,
            "vendor API response parsed"
        );
        Ok(batch)
    }

    /// Builds the request URL with the bounding box as query parameters.
    pub(crate) fn build_url(&self, bounds: &ViewportBounds) -> Url {
        let mut url = self.vendors_url.clone();
        url.query_pairs_mut()
            .append_pair("top_left_lat", &bounds.top_left.lat.to_string())
            .append_pair("top_left_lng", &bounds.top_left.lng.to_string())
            .append_pair("bottom_right_lat", &bounds.bottom_right.lat.to_string())
            .append_pair("bottom_right_lng", &bounds.bottom_right.lng.to_string());
        url
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the response
    /// body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, ClientError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
