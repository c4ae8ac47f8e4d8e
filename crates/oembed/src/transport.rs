//! The HTTP transport port and response status mapping.
//!
//! This crate never opens a socket. Infrastructure crates implement
//! [`HttpTransport`]; the client calls it once per fetch and interprets the
//! status with [`interpret_status`].

use async_trait::async_trait;
use tracing::debug;

use crate::{OEmbedError, RequestSpec, TransportError};

/// A completed HTTP exchange: status code and raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body, undecoded.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Performs one HTTP GET.
///
/// Implementations own timeouts, proxies, TLS, and cancellation; they must not
/// retry. Any status code is a successful exchange from the transport's point
/// of view; only failures to obtain a response are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GETs `url` and returns whatever the server answered.
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url).await
    }
}

/// Maps a provider response onto the protocol's outcomes.
///
/// - 200 → `Ok(Some(body))`
/// - 401 → `Ok(None)`: the provider declines to embed this resource
/// - 404 → [`OEmbedError::NotFound`] naming the target URL
/// - 501 → [`OEmbedError::FormatNotServed`] naming the format and domain
/// - anything else → [`OEmbedError::UnexpectedStatus`]
pub fn interpret_status(
    response: HttpResponse,
    spec: &RequestSpec,
) -> Result<Option<Vec<u8>>, OEmbedError> {
    debug!(status = response.status, bytes = response.body.len(), "Provider responded");
    match response.status {
        200 => Ok(Some(response.body)),
        401 => Ok(None),
        404 => Err(OEmbedError::NotFound {
            url: spec.url().to_string(),
        }),
        501 => Err(OEmbedError::FormatNotServed {
            format: spec.format(),
            domain: spec.domain().to_string(),
        }),
        status => Err(OEmbedError::UnexpectedStatus {
            status,
            request_url: spec.request_url().to_string(),
        }),
    }
}
