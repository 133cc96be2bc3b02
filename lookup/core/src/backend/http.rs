//! HTTP Registry Backend
//!
//! reqwest client for `GET {base_url}/company?type=..&data=..`.
//!
//! # Status mapping
//!
//! - 2xx with a JSON body: returned as-is for classification
//! - 2xx with an undecodable body: [`LookupError::Classification`]
//! - 404: [`LookupError::NotFound`], body ignored
//! - any other status: [`LookupError::Network`] carrying the body's `message`
//! - transport failure: [`LookupError::Network`] carrying the reqwest error

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use super::traits::{BackendConfig, RegistryBackend};
use crate::error::LookupError;
use crate::query::SearchQuery;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Registry client over HTTP
#[derive(Clone, Debug)]
pub struct HttpRegistry {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpRegistry {
    /// Build a client from `config`
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn new(config: &BackendConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            endpoint: config.endpoint(),
            http_client: builder.build()?,
        })
    }

    /// Search endpoint URL
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RegistryBackend for HttpRegistry {
    fn name(&self) -> &'static str {
        "HTTP"
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(&self.endpoint)
            .timeout(HEALTH_CHECK_TIMEOUT)
            .send()
            .await
            .is_ok()
    }

    async fn search(&self, query: &SearchQuery) -> Result<Value, LookupError> {
        tracing::debug!(endpoint = %self.endpoint, %query, "Sending registry request");

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&query.query_pairs())
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Registry returned error status");
            return Err(map_status_error(status, &body));
        }

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(error = %e, "Registry returned a non-JSON body");
            LookupError::Classification(None)
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> LookupError {
    LookupError::network(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> LookupError {
    if status == StatusCode::NOT_FOUND {
        return LookupError::NotFound;
    }
    LookupError::Network {
        message: body_message(body),
    }
}

/// `message` field of a JSON error body, if present and non-blank
fn body_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
}
