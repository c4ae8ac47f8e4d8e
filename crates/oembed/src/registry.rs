//! Provider registry and target-URL domain matching.
//!
//! The built-in registry is a read-only process-wide value. Callers wanting a
//! different provider set build their own [`ProviderRegistry`] and pass it in
//! [`crate::EmbedOptions`]; it replaces the default entirely.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::{Domain, OEmbedError};

// ---------------------------------------------------------------------------
// Provider descriptor
// ---------------------------------------------------------------------------

/// How to reach one provider's oEmbed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Endpoint URL without format suffix or query, e.g. `http://vimeo.com/api/oembed`.
    #[serde(alias = "base")]
    pub endpoint_base: String,

    /// `true` if the format is a path suffix (`oembed.json`) rather than a
    /// `format=` query parameter.
    #[serde(alias = "dot_format", default)]
    pub dot_format_style: bool,
}

impl ProviderDescriptor {
    /// Creates a descriptor.
    pub fn new(endpoint_base: impl Into<String>, dot_format_style: bool) -> Self {
        Self {
            endpoint_base: endpoint_base.into(),
            dot_format_style,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

static DEFAULT_PROVIDERS: LazyLock<ProviderRegistry> = LazyLock::new(|| {
    [
        ("youtube.com", "http://www.youtube.com/oembed", false),
        ("vimeo.com", "http://vimeo.com/api/oembed", true),
        ("flickr.com", "http://www.flickr.com/services/oembed", false),
        ("qik.com", "http://qik.com/api/oembed", true),
        ("revision3.com", "http://revision3.com/api/oembed", false),
        ("viddler.com", "http://lab.viddler.com/services/oembed", false),
        ("hulu.com", "http://www.hulu.com/api/oembed", true),
    ]
    .into_iter()
    .filter_map(|(domain, base, dot)| {
        Domain::new(domain).map(|d| (d, ProviderDescriptor::new(base, dot)))
    })
    .collect()
});

/// Mapping from normalized [`Domain`] to [`ProviderDescriptor`].
///
/// Deserializes from a JSON object keyed by domain. Keys are normalized on the
/// way in, and two keys that normalize to the same domain (`www.example.com`
/// and `example.com`) are rejected rather than one silently replacing the
/// other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, ProviderDescriptor>",
    into = "BTreeMap<Domain, ProviderDescriptor>"
)]
pub struct ProviderRegistry {
    providers: BTreeMap<Domain, ProviderDescriptor>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the built-in provider set.
    pub fn builtin() -> &'static ProviderRegistry {
        &DEFAULT_PROVIDERS
    }

    /// Adds a provider, replacing any existing entry for the same domain.
    ///
    /// Returns `None` (and adds nothing) if `domain` normalizes to nothing.
    pub fn with_provider(
        mut self,
        domain: impl AsRef<str>,
        descriptor: ProviderDescriptor,
    ) -> Option<Self> {
        let domain = Domain::new(domain)?;
        self.providers.insert(domain, descriptor);
        Some(self)
    }

    /// Returns the descriptor registered for `domain`, if any.
    pub fn get(&self, domain: &Domain) -> Option<&ProviderDescriptor> {
        self.providers.get(domain)
    }

    /// Iterates over registered providers in domain order.
    pub fn iter(&self) -> impl Iterator<Item = (&Domain, &ProviderDescriptor)> {
        self.providers.iter()
    }

    /// Number of registered providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns `true` if no providers are registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Resolves the provider serving `target_url`.
    ///
    /// The URL is split on `/`; it must have at least three segments and a
    /// scheme segment of exactly `http:` or `https:`. The domain is the third
    /// segment. Matching is exact: no subdomain or TLD wildcarding.
    pub fn lookup(&self, target_url: &str) -> Result<(Domain, &ProviderDescriptor), OEmbedError> {
        let domain = domain_of(target_url)?;
        match self.providers.get(&domain) {
            Some(descriptor) => Ok((domain, descriptor)),
            None => Err(OEmbedError::UnsupportedProvider {
                domain: domain.into(),
            }),
        }
    }
}

impl TryFrom<BTreeMap<String, ProviderDescriptor>> for ProviderRegistry {
    type Error = String;

    fn try_from(raw: BTreeMap<String, ProviderDescriptor>) -> Result<Self, Self::Error> {
        let mut providers = BTreeMap::new();
        for (key, descriptor) in raw {
            let domain = Domain::try_from(key.clone())?;
            if providers.contains_key(&domain) {
                return Err(format!("duplicate provider domain '{domain}' (from key '{key}')"));
            }
            providers.insert(domain, descriptor);
        }
        Ok(Self { providers })
    }
}

impl From<ProviderRegistry> for BTreeMap<Domain, ProviderDescriptor> {
    fn from(registry: ProviderRegistry) -> Self {
        registry.providers
    }
}

impl FromIterator<(Domain, ProviderDescriptor)> for ProviderRegistry {
    fn from_iter<I: IntoIterator<Item = (Domain, ProviderDescriptor)>>(iter: I) -> Self {
        Self {
            providers: iter.into_iter().collect(),
        }
    }
}

/// Extracts the normalized domain of an `http`/`https` target URL.
fn domain_of(target_url: &str) -> Result<Domain, OEmbedError> {
    let segments: Vec<&str> = target_url.split('/').collect();
    if segments.len() < 3 || !matches!(segments[0], "http:" | "https:") {
        return Err(OEmbedError::UnsupportedProtocol {
            url: target_url.to_string(),
        });
    }
    Domain::new(segments[2]).ok_or_else(|| OEmbedError::UnsupportedProvider {
        domain: segments[2].to_string(),
    })
}
