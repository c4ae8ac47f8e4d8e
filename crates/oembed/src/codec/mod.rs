//! Response formats, codec availability, and format negotiation.
//!
//! The set of formats is closed: [`Format::Json`] and [`Format::Xml`], in that
//! table order, with JSON as the default. Which codecs can actually run is a
//! separate question answered by a [`CodecAvailability`]; the built-in answer
//! depends on which cargo features were compiled in.

mod json;
#[cfg(feature = "xml")]
mod xml;

use tracing::{debug, warn};

use crate::{EmbedData, OEmbedError};

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

/// A response format a provider can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `application/json` responses.
    Json,
    /// `text/xml` responses with an `<oembed>` root element.
    Xml,
}

impl Format {
    /// Every known format, in negotiation order.
    pub const ALL: [Format; 2] = [Format::Json, Format::Xml];

    /// Format tried first when none is requested.
    pub const DEFAULT: Format = Format::Json;

    /// Looks up a format by its wire identifier (`"json"`, `"xml"`).
    ///
    /// Identifiers are case-sensitive.
    pub fn from_id(id: &str) -> Option<Format> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    /// Returns the wire identifier used in request URLs.
    pub fn id(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
        }
    }

    /// Decodes a response body into an embed payload.
    pub fn decode(self, body: &[u8]) -> Result<EmbedData, OEmbedError> {
        let decoded = match self {
            Format::Json => json::decode(body),
            #[cfg(feature = "xml")]
            Format::Xml => xml::decode(body),
            #[cfg(not(feature = "xml"))]
            Format::Xml => {
                return Err(OEmbedError::CodecUnavailable {
                    attempted: vec![Format::Xml],
                })
            }
        };
        decoded
            .map(EmbedData::from)
            .map_err(|message| OEmbedError::MalformedResponse {
                format: self,
                message,
            })
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

/// Reports whether the backing capability for a codec is present.
pub trait CodecAvailability: Send + Sync {
    /// Returns `true` if `format` can be decoded in this environment.
    fn is_available(&self, format: Format) -> bool;
}

/// Availability as compiled: JSON always, XML when the `xml` feature is on.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCodecs;

impl CodecAvailability for BuiltinCodecs {
    fn is_available(&self, format: Format) -> bool {
        match format {
            Format::Json => true,
            Format::Xml => cfg!(feature = "xml"),
        }
    }
}

// ---------------------------------------------------------------------------
// Negotiation
// ---------------------------------------------------------------------------

/// Chooses the format a client will request and decode with.
///
/// An explicit request must name a known format and is never substituted. With
/// no request, the default is tried first and then every other format in table
/// order; the error lists every attempt.
pub fn resolve_format(
    requested: Option<&str>,
    codecs: &dyn CodecAvailability,
) -> Result<Format, OEmbedError> {
    if let Some(id) = requested {
        let format = Format::from_id(id).ok_or_else(|| OEmbedError::UnknownFormat {
            requested: id.to_string(),
        })?;
        if !codecs.is_available(format) {
            return Err(OEmbedError::CodecUnavailable {
                attempted: vec![format],
            });
        }
        return Ok(format);
    }

    let candidates = std::iter::once(Format::DEFAULT)
        .chain(Format::ALL.into_iter().filter(|f| *f != Format::DEFAULT));

    let mut attempted = Vec::with_capacity(Format::ALL.len());
    for format in candidates {
        attempted.push(format);
        if codecs.is_available(format) {
            if attempted.len() > 1 {
                warn!(
                    format = %format,
                    skipped = ?&attempted[..attempted.len() - 1],
                    "Default codec unavailable; falling back"
                );
            }
            debug!(format = %format, "Resolved response format");
            return Ok(format);
        }
    }

    Err(OEmbedError::CodecUnavailable { attempted })
}
