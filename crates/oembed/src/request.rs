//! Construction inputs and the validated request they produce.
//!
//! [`EmbedOptions`] is what a caller hands over; [`RequestSpec`] is what
//! construction turns it into once the target is validated, the provider
//! resolved, the format negotiated, and the request URL composed. Nothing in a
//! `RequestSpec` changes afterwards.

use crate::{
    resolve_format, CodecAvailability, Domain, Format, OEmbedError, ProviderDescriptor,
    ProviderRegistry,
};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Caller-supplied construction input.
///
/// `url` is the only required field. `providers`, when set, replaces the
/// built-in registry outright. Every entry in `params` is forwarded to the
/// provider as a query parameter, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct EmbedOptions {
    /// Target resource URL. Construction fails with `MissingUrl` without it.
    pub url: Option<String>,
    /// Registry replacing the built-in providers.
    pub providers: Option<ProviderRegistry>,
    /// Requested format id (`json`, `xml`). Negotiated when `None`.
    pub format: Option<String>,
    /// Extra query parameters, forwarded in order.
    pub params: Vec<(String, String)>,
}

impl EmbedOptions {
    /// Options targeting `url` with every other field defaulted.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Builds options from a free-form key/value list.
    ///
    /// `url` and `format` are recognised; every other pair becomes an extra
    /// parameter. A later `url` or `format` overrides an earlier one.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            let key = key.into();
            match key.as_str() {
                "url" => options.url = Some(value.to_string()),
                "format" => options.format = Some(value.to_string()),
                _ => options.params.push((key, value.to_string())),
            }
        }
        options
    }

    /// Requests a specific response format by id.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Replaces the provider registry for this request.
    pub fn with_providers(mut self, providers: ProviderRegistry) -> Self {
        self.providers = Some(providers);
        self
    }

    /// Appends an extra query parameter (e.g. `maxwidth`).
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }
}

// ---------------------------------------------------------------------------
// Validated request
// ---------------------------------------------------------------------------

/// A validated, ready-to-send oEmbed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    url: String,
    domain: Domain,
    provider: ProviderDescriptor,
    format: Format,
    params: Vec<(String, String)>,
    request_url: String,
}

impl RequestSpec {
    /// Validates `options` and composes the request URL.
    ///
    /// Runs target validation, provider lookup, format negotiation, and URL
    /// composition in that order, stopping at the first failure. Performs no
    /// network I/O.
    pub fn build(
        options: EmbedOptions,
        codecs: &dyn CodecAvailability,
    ) -> Result<Self, OEmbedError> {
        let EmbedOptions {
            url,
            providers,
            format,
            params,
        } = options;
        let url = url.ok_or(OEmbedError::MissingUrl)?;

        let registry = match &providers {
            Some(registry) => registry,
            None => ProviderRegistry::builtin(),
        };
        let (domain, provider) = registry.lookup(&url)?;
        let provider = provider.clone();

        let format = resolve_format(format.as_deref(), codecs)?;
        let request_url = build_request_url(&provider, format, &url, &params);

        Ok(Self {
            url,
            domain,
            provider,
            format,
            params,
            request_url,
        })
    }

    /// The target resource URL, as supplied.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The provider's normalized domain.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// The registry entry the domain resolved to.
    pub fn provider(&self) -> &ProviderDescriptor {
        &self.provider
    }

    /// The negotiated response format.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Extra query parameters, in the order they were supplied.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// The full URL the fetch will GET.
    pub fn request_url(&self) -> &str {
        &self.request_url
    }
}

// ---------------------------------------------------------------------------
// URL composition
// ---------------------------------------------------------------------------

/// Composes a provider request URL.
///
/// Dot-format providers get `{base}.{format}?url=...`; others get
/// `{base}?url=...&format={format}`. Extra parameters follow in order, key and
/// value both form-encoded (space becomes `+`).
pub fn build_request_url(
    provider: &ProviderDescriptor,
    format: Format,
    target_url: &str,
    params: &[(String, String)],
) -> String {
    let base = &provider.endpoint_base;
    let target = encode(target_url);
    let mut request_url = if provider.dot_format_style {
        format!("{base}.{format}?url={target}")
    } else {
        format!("{base}?url={target}&format={format}")
    };

    for (key, value) in params {
        request_url.push('&');
        request_url.push_str(&encode(key));
        request_url.push('=');
        request_url.push_str(&encode(value));
    }
    request_url
}

fn encode(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BuiltinCodecs, ErrorKind};

    fn vimeo() -> ProviderDescriptor {
        ProviderDescriptor::new("http://vimeo.com/api/oembed", true)
    }

    fn youtube() -> ProviderDescriptor {
        ProviderDescriptor::new("http://www.youtube.com/oembed", false)
    }

    #[test]
    fn test_dot_format_url() {
        assert_eq!(
            build_request_url(&vimeo(), Format::Json, "http://vimeo.com/6382511", &[]),
            "http://vimeo.com/api/oembed.json?url=http%3A%2F%2Fvimeo.com%2F6382511"
        );
    }

    #[test]
    fn test_query_format_url() {
        assert_eq!(
            build_request_url(
                &youtube(),
                Format::Xml,
                "http://www.youtube.com/watch?v=abc&t=1",
                &[]
            ),
            "http://www.youtube.com/oembed\
             ?url=http%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3Dabc%26t%3D1&format=xml"
        );
    }

    #[test]
    fn test_extra_params_in_order_and_encoded() {
        let params = vec![
            ("maxwidth".to_string(), "600".to_string()),
            ("call back".to_string(), "a&b=c".to_string()),
            ("maxheight".to_string(), "400".to_string()),
        ];
        assert_eq!(
            build_request_url(&vimeo(), Format::Json, "http://vimeo.com/1", &params),
            "http://vimeo.com/api/oembed.json?url=http%3A%2F%2Fvimeo.com%2F1\
             &maxwidth=600&call+back=a%26b%3Dc&maxheight=400"
        );
    }

    #[test]
    fn test_encoding_matches_form_style() {
        let params = vec![("title".to_string(), "a b*c~d/é".to_string())];
        assert_eq!(
            build_request_url(&vimeo(), Format::Json, "http://vimeo.com/a b", &params),
            "http://vimeo.com/api/oembed.json?url=http%3A%2F%2Fvimeo.com%2Fa+b\
             &title=a+b*c%7Ed%2F%C3%A9"
        );
    }

    #[test]
    fn test_spec_build_defaults() {
        let spec = RequestSpec::build(
            EmbedOptions::new("http://www.vimeo.com/6382511").param("maxwidth", 600),
            &BuiltinCodecs,
        )
        .unwrap();
        assert_eq!(spec.url(), "http://www.vimeo.com/6382511");
        assert_eq!(spec.domain().as_str(), "vimeo.com");
        assert_eq!(spec.format(), Format::Json);
        assert_eq!(spec.params(), &[("maxwidth".to_string(), "600".to_string())]);
        assert_eq!(
            spec.request_url(),
            "http://vimeo.com/api/oembed.json\
             ?url=http%3A%2F%2Fwww.vimeo.com%2F6382511&maxwidth=600"
        );
    }

    #[test]
    fn test_missing_url_wins_over_everything() {
        let cases = [
            EmbedOptions::default(),
            EmbedOptions::default().with_format("yaml"),
            EmbedOptions::default().with_providers(ProviderRegistry::new()),
            EmbedOptions::default().with_format("xml").param("maxwidth", 1),
        ];
        for options in cases {
            let err = RequestSpec::build(options, &BuiltinCodecs).unwrap_err();
            assert!(matches!(err, OEmbedError::MissingUrl));
            assert_eq!(err.kind(), ErrorKind::Usage);
        }
    }

    #[test]
    fn test_custom_providers_replace_builtin() {
        let providers = ProviderRegistry::new()
            .with_provider(
                "example.com",
                ProviderDescriptor::new("https://example.com/oembed", false),
            )
            .unwrap();
        let spec = RequestSpec::build(
            EmbedOptions::new("https://example.com/p/1").with_providers(providers.clone()),
            &BuiltinCodecs,
        )
        .unwrap();
        assert_eq!(
            spec.request_url(),
            "https://example.com/oembed?url=https%3A%2F%2Fexample.com%2Fp%2F1&format=json"
        );

        let err = RequestSpec::build(
            EmbedOptions::new("http://vimeo.com/1").with_providers(providers),
            &BuiltinCodecs,
        )
        .unwrap_err();
        assert!(matches!(err, OEmbedError::UnsupportedProvider { .. }));
    }

    #[test]
    fn test_from_pairs_recognises_reserved_keys() {
        let options = EmbedOptions::from_pairs([
            ("url", "http://vimeo.com/1"),
            ("maxwidth", "600"),
            ("format", "xml"),
        ]);
        assert_eq!(options.url.as_deref(), Some("http://vimeo.com/1"));
        assert_eq!(options.format.as_deref(), Some("xml"));
        assert_eq!(
            options.params,
            vec![("maxwidth".to_string(), "600".to_string())]
        );
    }
}
