//! oEmbed HTTP transport adapter.
//!
//! Implements the [`oembed::HttpTransport`] trait with `reqwest`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Connection handling, TLS, timeouts, proxying, and
//! default headers live here. The [`oembed`] crate sees only
//! [`oembed::HttpTransport`] and never retries; neither does this adapter.
//!
//! Timeouts are off unless configured: the oEmbed client has no timeout of its
//! own, so callers that need one set it in [`TransportConfig`].

mod config;

use async_trait::async_trait;
use oembed::{HttpResponse, HttpTransport, TransportError};
use tracing::{debug, warn};

pub use config::{TransportConfig, TransportConfigError};

/// [`HttpTransport`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport from `config`.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportConfigError> {
        Ok(Self {
            client: config.build_client()?,
        })
    }

    /// Wraps an existing client, e.g. one shared with the rest of an application.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_reqwest_error(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| map_reqwest_error(url, e))?;

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

fn map_reqwest_error(url: &str, error: reqwest::Error) -> TransportError {
    let url = url.to_string();
    if error.is_builder() {
        return TransportError::InvalidUrl {
            url,
            message: error.to_string(),
        };
    }
    if error.is_timeout() {
        warn!(url = %url, "Request timed out");
        return TransportError::Timeout { url };
    }
    TransportError::Request {
        url,
        message: error.to_string(),
    }
}
