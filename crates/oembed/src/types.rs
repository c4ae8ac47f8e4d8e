//! Decoded embed payloads.
//!
//! [`EmbedData`] keeps the full decoded mapping, whatever the provider sent,
//! and layers typed accessors over the fields the oEmbed protocol standardises.
//! XML responses carry every value as a string, so numeric accessors accept
//! both JSON numbers and numeric strings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Embed type
// ---------------------------------------------------------------------------

/// The resource type a provider reports in the `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EmbedType {
    /// A static photo; `url`, `width`, `height` describe it.
    Photo,
    /// Playable video; `html` carries the player markup.
    Video,
    /// A generic link with no embeddable representation.
    Link,
    /// Rich HTML content; `html` carries the markup.
    Rich,
    /// Any value outside the standard set.
    Other(String),
}

impl EmbedType {
    /// Parses a `type` field value.
    pub fn parse(value: &str) -> Self {
        match value {
            "photo" => Self::Photo,
            "video" => Self::Video,
            "link" => Self::Link,
            "rich" => Self::Rich,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the wire value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Link => "link",
            Self::Rich => "rich",
            Self::Other(other) => other,
        }
    }
}

impl std::fmt::Display for EmbedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Embed data
// ---------------------------------------------------------------------------

/// A decoded oEmbed response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbedData(Map<String, Value>);

impl EmbedData {
    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the value under `key` if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns the value under `key` as an unsigned integer.
    ///
    /// Accepts JSON numbers and decimal strings (the XML codec's representation).
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        match self.0.get(key)? {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The resource type (`type` field).
    pub fn embed_type(&self) -> Option<EmbedType> {
        self.get_str("type").map(EmbedType::parse)
    }

    /// The protocol version the provider answered with (`version`).
    pub fn version(&self) -> Option<&str> {
        self.get_str("version")
    }

    /// Resource title.
    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    /// Name of the resource's author.
    pub fn author_name(&self) -> Option<&str> {
        self.get_str("author_name")
    }

    /// URL for the resource's author.
    pub fn author_url(&self) -> Option<&str> {
        self.get_str("author_url")
    }

    /// Name of the provider.
    pub fn provider_name(&self) -> Option<&str> {
        self.get_str("provider_name")
    }

    /// URL of the provider.
    pub fn provider_url(&self) -> Option<&str> {
        self.get_str("provider_url")
    }

    /// Embed markup for `video` and `rich` types.
    pub fn html(&self) -> Option<&str> {
        self.get_str("html")
    }

    /// Source URL for `photo` types.
    pub fn url(&self) -> Option<&str> {
        self.get_str("url")
    }

    /// Width in pixels.
    pub fn width(&self) -> Option<u64> {
        self.get_u64("width")
    }

    /// Height in pixels.
    pub fn height(&self) -> Option<u64> {
        self.get_u64("height")
    }

    /// URL of a thumbnail image for the resource.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.get_str("thumbnail_url")
    }

    /// Thumbnail width in pixels.
    pub fn thumbnail_width(&self) -> Option<u64> {
        self.get_u64("thumbnail_width")
    }

    /// Thumbnail height in pixels.
    pub fn thumbnail_height(&self) -> Option<u64> {
        self.get_u64("thumbnail_height")
    }

    /// Borrows the full decoded mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the payload, returning the full decoded mapping.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the payload has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for EmbedData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
