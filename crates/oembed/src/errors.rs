//! Error taxonomy for the oEmbed client.
//!
//! [`OEmbedError`] covers every failure the client can surface, at either
//! phase of its lifecycle: construction (validation, format negotiation) or
//! fetch (transport, status mapping, decoding). Transport-level failures are
//! described by [`TransportError`], which adapters produce and the client wraps.
//!
//! A provider declining to embed (HTTP 401) is deliberately **not** an error;
//! see [`crate::OEmbed::fetch`].

use thiserror::Error;

use crate::Format;

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

/// Coarse classification of an [`OEmbedError`].
///
/// Callers match on this to decide whether to retry with another URL, report
/// to the user, or skip the target silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller mistake: missing URL or unknown format id.
    Usage,
    /// The target, provider, or format combination cannot be served.
    Unsupported,
    /// The provider reports the target resource does not exist.
    NotFound,
    /// No registered codec could be engaged in this environment.
    CodecUnavailable,
    /// A 200 response body could not be decoded.
    MalformedResponse,
    /// The request did not complete or returned an unmapped status.
    Transport,
}

// ---------------------------------------------------------------------------
// Client errors
// ---------------------------------------------------------------------------

/// Errors produced while constructing or fetching an oEmbed request.
#[derive(Debug, Error)]
pub enum OEmbedError {
    /// No target URL was supplied in the options.
    #[error("No url provided in options")]
    MissingUrl,

    /// An explicitly requested format id is not in the format table.
    #[error("Requested format not supported: {requested}")]
    UnknownFormat {
        /// The id the caller asked for.
        requested: String,
    },

    /// The target URL is not `http:` or `https:`, or is too short to carry a domain.
    #[error("Unsupported protocol: {url}")]
    UnsupportedProtocol {
        /// The rejected target URL.
        url: String,
    },

    /// The target's domain has no entry in the provider registry.
    #[error("Unsupported provider: {domain}")]
    UnsupportedProvider {
        /// The normalized domain that was looked up.
        domain: String,
    },

    /// The provider answered 501 for the resolved format.
    #[error("{format} not supported by {domain}")]
    FormatNotServed {
        /// The format the request was made in.
        format: Format,
        /// The provider's normalized domain.
        domain: String,
    },

    /// The provider answered 404 for the target.
    #[error("{url} not found")]
    NotFound {
        /// The original target URL (not the request URL).
        url: String,
    },

    /// Every candidate codec was unavailable during format negotiation.
    #[error(
        "Could not find any suitable codec to parse the response with, tried: {}",
        join_formats(.attempted)
    )]
    CodecUnavailable {
        /// Codecs tried, in the order they were tried.
        attempted: Vec<Format>,
    },

    /// The response body could not be decoded with the resolved codec.
    #[error("Malformed {format} response: {message}")]
    MalformedResponse {
        /// The codec that failed.
        format: Format,
        /// The codec's own failure description.
        message: String,
    },

    /// The provider answered with a status the protocol assigns no meaning to.
    #[error("Unexpected HTTP status {status} from {request_url}")]
    UnexpectedStatus {
        /// The HTTP status code received.
        status: u16,
        /// The composed request URL.
        request_url: String,
    },

    /// The transport failed before a response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl OEmbedError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingUrl | Self::UnknownFormat { .. } => ErrorKind::Usage,
            Self::UnsupportedProtocol { .. }
            | Self::UnsupportedProvider { .. }
            | Self::FormatNotServed { .. } => ErrorKind::Unsupported,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::CodecUnavailable { .. } => ErrorKind::CodecUnavailable,
            Self::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Self::UnexpectedStatus { .. } | Self::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Returns `true` if repeating the same request could plausibly succeed.
    ///
    /// That is any transport failure, plus the statuses that signal a
    /// temporary condition: 408, 429 and 5xx. Other unmapped statuses (400,
    /// 403, 410, ...) are permanent for this request. The client itself never
    /// retries; this is a hint for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::UnexpectedStatus { status, .. } => matches!(status, 408 | 429 | 500..=599),
            _ => false,
        }
    }
}

fn join_formats(formats: &[Format]) -> String {
    formats
        .iter()
        .map(|f| f.id())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Failures reported by an [`crate::HttpTransport`] implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request URL could not be parsed by the transport.
    #[error("Invalid request URL '{url}': {message}")]
    InvalidUrl {
        /// The request URL.
        url: String,
        /// Parser description.
        message: String,
    },

    /// The request exceeded a configured timeout.
    #[error("Request to {url} timed out")]
    Timeout {
        /// The request URL.
        url: String,
    },

    /// Any other failure: connection refused, TLS, body read, etc.
    #[error("Request to {url} failed: {message}")]
    Request {
        /// The request URL.
        url: String,
        /// Transport description.
        message: String,
    },
}
