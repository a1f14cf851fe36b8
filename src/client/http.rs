//! HTTP client for API requests

use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::errors::{GeminiError, GeminiResult};

use super::ExchangeConfig;

/// Thin wrapper over `reqwest` returning raw JSON nodes
///
/// Responses are deliberately returned as `serde_json::Value` so the
/// caller can run the error-envelope check before typed deserialization.
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a new HTTP client bound to a base URL
    pub fn new(base_url: impl Into<String>, config: &ExchangeConfig) -> GeminiResult<Self> {
        let base_url_str = base_url.into();
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms()))
            .build()
            .map_err(|e| GeminiError::NetworkError {
                url: base_url_str.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url_str,
        })
    }

    /// GET request with optional query parameters
    pub async fn get(
        &self,
        path: &str,
        params: Option<HashMap<String, String>>,
    ) -> GeminiResult<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%path, "GET");

        let mut request = self.client.get(&url);

        if let Some(params) = params {
            request = request.query(&params);
        }

        let response = request.send().await.map_err(GeminiError::from)?;
        let status = response.status();
        let body = response.text().await.map_err(GeminiError::from)?;

        // The exchange delivers its application-error envelope with a
        // non-2xx status; parse the body in either case so the envelope
        // check at the call site sees the original reason text.
        match serde_json::from_str(&body) {
            Ok(node) => Ok(node),
            Err(_) if !status.is_success() => Err(GeminiError::NetworkError {
                url,
                message: format!("HTTP {status}"),
            }),
            Err(e) => Err(GeminiError::ParseError {
                data_type: "json".into(),
                message: e.to_string(),
            }),
        }
    }

    /// POST request carrying the signed header set and an empty body
    ///
    /// The exchange reads the payload from the headers; sending any body
    /// breaks signature validation, so none is ever attached here.
    pub async fn post_headers_only(
        &self,
        path: &str,
        headers: HashMap<String, String>,
    ) -> GeminiResult<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%path, "POST (headers only)");

        let mut request = self
            .client
            .post(&url)
            .header("Content-Length", "0")
            .header("Content-Type", "text/plain")
            .header("Cache-Control", "no-cache");

        for (key, value) in headers {
            request = request.header(&key, &value);
        }

        let response = request.send().await.map_err(GeminiError::from)?;
        let status = response.status();
        let body = response.text().await.map_err(GeminiError::from)?;

        match serde_json::from_str(&body) {
            Ok(node) => Ok(node),
            Err(_) if !status.is_success() => Err(GeminiError::NetworkError {
                url,
                message: format!("HTTP {status}"),
            }),
            Err(e) => Err(GeminiError::ParseError {
                data_type: "json".into(),
                message: e.to_string(),
            }),
        }
    }

    /// Base URL this client is bound to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
