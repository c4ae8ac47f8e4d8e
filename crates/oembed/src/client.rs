//! The client facade.
//!
//! An [`OEmbed`] is built once per target URL. Construction validates the
//! options and composes the request URL without touching the network; each
//! [`OEmbed::fetch`] then performs exactly one GET through the injected
//! transport and decodes the answer with the negotiated codec.

use tracing::{info, info_span, Instrument};

use crate::{
    interpret_status, BuiltinCodecs, CodecAvailability, Domain, EmbedData, EmbedOptions, Format,
    HttpTransport, OEmbedError, ProviderDescriptor, RequestId, RequestSpec,
};

/// A single-target oEmbed request bound to a transport.
///
/// # Example
///
/// ```rust,ignore
/// let client = OEmbed::new(
///     EmbedOptions::new("http://vimeo.com/6382511").param("maxwidth", 600),
///     ReqwestTransport::new(TransportConfig::default())?,
/// )?;
/// match client.fetch().await? {
///     Some(embed) => println!("{}", embed.html().unwrap_or_default()),
///     None => println!("embedding disabled"),
/// }
/// ```
#[derive(Debug)]
pub struct OEmbed<T> {
    spec: RequestSpec,
    transport: T,
}

impl<T: HttpTransport> OEmbed<T> {
    /// Validates `options` against the built-in codec set.
    pub fn new(options: EmbedOptions, transport: T) -> Result<Self, OEmbedError> {
        Self::with_codecs(options, transport, &BuiltinCodecs)
    }

    /// Validates `options`, probing codec availability through `codecs`.
    pub fn with_codecs(
        options: EmbedOptions,
        transport: T,
        codecs: &dyn CodecAvailability,
    ) -> Result<Self, OEmbedError> {
        let spec = RequestSpec::build(options, codecs)?;
        Ok(Self::from_spec(spec, transport))
    }

    /// Binds an already validated request to a transport.
    pub fn from_spec(spec: RequestSpec, transport: T) -> Self {
        Self { spec, transport }
    }

    /// The validated request this client sends.
    pub fn spec(&self) -> &RequestSpec {
        &self.spec
    }

    /// The target resource URL.
    pub fn url(&self) -> &str {
        self.spec.url()
    }

    /// The URL each fetch will GET.
    pub fn request_url(&self) -> &str {
        self.spec.request_url()
    }

    /// The provider's normalized domain.
    pub fn domain(&self) -> &Domain {
        self.spec.domain()
    }

    /// The provider the target resolved to.
    pub fn provider(&self) -> &ProviderDescriptor {
        self.spec.provider()
    }

    /// The negotiated response format.
    pub fn format(&self) -> Format {
        self.spec.format()
    }

    /// Fetches and decodes the embed payload.
    ///
    /// Returns `Ok(None)` when the provider declines to embed the resource
    /// (HTTP 401). Every call issues a fresh request; nothing is cached and
    /// nothing is retried.
    pub async fn fetch(&self) -> Result<Option<EmbedData>, OEmbedError> {
        let request_id = RequestId::new_random();
        let span = info_span!(
            "oembed.fetch",
            request_id = %request_id,
            domain = %self.spec.domain(),
            format = %self.spec.format(),
        );

        self.fetch_once().instrument(span).await
    }

    async fn fetch_once(&self) -> Result<Option<EmbedData>, OEmbedError> {
        let response = self.transport.get(self.spec.request_url()).await?;
        let Some(body) = interpret_status(response, &self.spec)? else {
            info!(url = self.spec.url(), "Embedding disabled by provider");
            return Ok(None);
        };
        let data = self.spec.format().decode(&body)?;
        info!(keys = data.len(), "Decoded embed payload");
        Ok(Some(data))
    }
}
