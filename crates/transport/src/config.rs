//! Transport configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while turning a [`TransportConfig`] into a client.
#[derive(Debug, Error)]
pub enum TransportConfigError {
    /// The proxy URL was rejected by reqwest.
    #[error("Invalid proxy URL '{url}': {message}")]
    InvalidProxy {
        /// The configured proxy URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    /// A header name or value is not valid HTTP.
    #[error("Invalid header '{name}': {message}")]
    InvalidHeader {
        /// The offending header name.
        name: String,
        /// Why it was rejected.
        message: String,
    },

    /// The client builder failed, e.g. the TLS backend could not initialise.
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

/// Settings for [`crate::ReqwestTransport`].
///
/// Every field is optional; the default is a plain client with no timeouts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Whole-request timeout, connect through body read.
    pub timeout: Option<Duration>,
    /// Timeout for establishing the TCP/TLS connection only.
    pub connect_timeout: Option<Duration>,
    /// `User-Agent` header sent with every request.
    pub user_agent: Option<String>,
    /// Proxy URL applied to all schemes.
    pub proxy: Option<String>,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
}

impl TransportConfig {
    /// Sets the whole-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the `User-Agent` header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Routes every request through `proxy`.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Adds a default header. Repeated names are all sent.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client, TransportConfigError> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(proxy_url) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                TransportConfigError::InvalidProxy {
                    url: proxy_url.clone(),
                    message: e.to_string(),
                }
            })?;
            builder = builder.proxy(proxy);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        if !self.headers.is_empty() {
            let mut headers = reqwest::header::HeaderMap::new();
            for (name, value) in &self.headers {
                let header_name = reqwest::header::HeaderName::from_bytes(name.as_bytes())
                    .map_err(|e| TransportConfigError::InvalidHeader {
                        name: name.clone(),
                        message: e.to_string(),
                    })?;
                let header_value = reqwest::header::HeaderValue::from_str(value).map_err(|e| {
                    TransportConfigError::InvalidHeader {
                        name: name.clone(),
                        message: e.to_string(),
                    }
                })?;
                headers.append(header_name, header_value);
            }
            builder = builder.default_headers(headers);
        }

        builder
            .build()
            .map_err(|e| TransportConfigError::Build(e.to_string()))
    }
}
