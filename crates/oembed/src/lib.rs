//! oEmbed client domain.
//!
//! Resolves a media URL into a provider's embeddable representation: find the
//! provider for the URL's domain, negotiate a response format, compose the
//! request URL, perform one GET, map the status, decode the body.
//!
//! ## Architectural Layer
//!
//! **Domain + orchestration.** This crate has no network I/O dependencies.
//! It defines the [`HttpTransport`] port; the `transport` crate supplies a
//! `reqwest`-backed implementation and tests supply fakes.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | `Domain` (normalized provider key), `RequestId` |
//! | [`registry`] | Provider descriptors, built-in registry, target-URL lookup |
//! | [`codec`] | `Format`, codec availability, format negotiation, decoders |
//! | [`request`] | `EmbedOptions`, `RequestSpec`, request URL composition |
//! | [`transport`] | `HttpTransport` port, status mapping |
//! | [`types`] | `EmbedData`, `EmbedType` |
//! | [`client`] | The `OEmbed` facade |
//! | [`errors`] | `OEmbedError`, `ErrorKind`, `TransportError` |
//!
//! ## Cargo features
//!
//! - `xml` (default): enables the XML codec. Without it, format negotiation
//!   reports XML unavailable and an explicit `xml` request fails.

pub mod client;
pub mod codec;
pub mod errors;
pub mod identifiers;
pub mod registry;
pub mod request;
pub mod transport;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use client::OEmbed;
pub use codec::{resolve_format, BuiltinCodecs, CodecAvailability, Format};
pub use errors::{ErrorKind, OEmbedError, TransportError};
pub use identifiers::{Domain, RequestId};
pub use registry::{ProviderDescriptor, ProviderRegistry};
pub use request::{build_request_url, EmbedOptions, RequestSpec};
pub use transport::{interpret_status, HttpResponse, HttpTransport};
pub use types::{EmbedData, EmbedType};
