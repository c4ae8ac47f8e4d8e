//! Newtype identifiers.
//!
//! A [`Domain`] is always held in normalized form so registry keys and lookups
//! compare equal without callers having to remember the rules. A [`RequestId`]
//! tags one fetch in logs and spans.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Domain
// ---------------------------------------------------------------------------

/// A provider domain in normalized form: lowercase, leading `www.` removed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Domain(String);

impl Domain {
    /// Normalizes `value` into a domain, returning `None` if nothing remains.
    pub fn new(value: impl AsRef<str>) -> Option<Self> {
        let lower = value.as_ref().trim().to_ascii_lowercase();
        let stripped = lower.strip_prefix("www.").unwrap_or(&lower);
        if stripped.is_empty() {
            None
        } else {
            Some(Self(stripped.to_string()))
        }
    }

    /// Returns the domain as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Domain {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or_else(|| format!("invalid domain '{value}'"))
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.0
    }
}

// ---------------------------------------------------------------------------
// RequestId
// ---------------------------------------------------------------------------

/// Identifies a single fetch.
///
/// Generated fresh for every call to [`crate::OEmbed::fetch`] and recorded on
/// its span so transport and client events can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a new random request identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
