//! End-to-end tests: `OEmbed` over `ReqwestTransport` against a mock provider.
//!
//! Response bodies follow the shapes documented at https://oembed.com.

use std::time::Duration;

use oembed::{
    EmbedOptions, EmbedType, ErrorKind, OEmbed, OEmbedError, ProviderDescriptor, ProviderRegistry,
    TransportError,
};
use serde_json::json;
use transport::{ReqwestTransport, TransportConfig};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn video_response() -> serde_json::Value {
    json!({
        "type": "video",
        "version": "1.0",
        "provider_name": "Vimeo",
        "provider_url": "https://vimeo.com/",
        "title": "Sample clip",
        "author_name": "Someone",
        "width": 600,
        "height": 338,
        "html": concat!(
            r#"<iframe src="https://player.vimeo.com/video/6382511" "#,
            r#"width="600" height="338"></iframe>"#
        ),
        "thumbnail_url": "https://i.vimeocdn.com/video/1.jpg"
    })
}

/// Registers the mock server as the provider for `example.com`.
fn providers(server: &MockServer, dot_format: bool) -> ProviderRegistry {
    ProviderRegistry::new()
        .with_provider(
            "example.com",
            ProviderDescriptor::new(format!("{}/api/oembed", server.uri()), dot_format),
        )
        .unwrap()
}

fn client(server: &MockServer, options: EmbedOptions) -> OEmbed<ReqwestTransport> {
    let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
    OEmbed::new(options.with_providers(providers(server, true)), transport).unwrap()
}

#[tokio::test]
async fn test_fetch_video_dot_format() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/oembed.json"))
        .and(query_param("url", "http://example.com/6382511"))
        .and(query_param("maxwidth", "600"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(
        &server,
        EmbedOptions::new("http://example.com/6382511").param("maxwidth", 600),
    );
    let embed = client.fetch().await.unwrap().expect("embed data");

    assert_eq!(embed.get_str("type"), Some("video"));
    assert_eq!(embed.embed_type(), Some(EmbedType::Video));
    assert_eq!(embed.width(), Some(600));
    assert_eq!(embed.provider_name(), Some("Vimeo"));
    assert!(embed.html().unwrap().contains("player.vimeo.com"));
}

#[tokio::test]
async fn test_fetch_query_format_xml() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/oembed"))
        .and(query_param("format", "xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?>
<oembed>
  <version>1.0</version>
  <type>photo</type>
  <width>240</width>
  <height>160</height>
  <title>ZB8T0193</title>
  <url>http://farm4.static.flickr.com/3123/2341623661_7c99f48bbf_m.jpg</url>
</oembed>"#,
        ))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
    let client = OEmbed::new(
        EmbedOptions::new("http://www.example.com/photos/1")
            .with_format("xml")
            .with_providers(providers(&server, false)),
        transport,
    )
    .unwrap();
    let embed = client.fetch().await.unwrap().expect("embed data");

    assert_eq!(embed.embed_type(), Some(EmbedType::Photo));
    assert_eq!(embed.width(), Some(240));
    assert_eq!(
        embed.url(),
        Some("http://farm4.static.flickr.com/3123/2341623661_7c99f48bbf_m.jpg")
    );
}

#[tokio::test]
async fn test_unauthorized_is_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client(&server, EmbedOptions::new("http://example.com/private"));
    assert!(client.fetch().await.unwrap().is_none());
}

#[tokio::test]
async fn test_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client(&server, EmbedOptions::new("http://example.com/missing"));
    let err = client.fetch().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "http://example.com/missing not found");
}

#[tokio::test]
async fn test_not_implemented() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(501))
        .mount(&server)
        .await;

    let client = client(&server, EmbedOptions::new("http://example.com/1"));
    let err = client.fetch().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    assert_eq!(err.to_string(), "json not supported by example.com");
}

#[tokio::test]
async fn test_server_error_is_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client(&server, EmbedOptions::new("http://example.com/1"));
    let err = client.fetch().await.unwrap_err();
    assert!(matches!(err, OEmbedError::UnexpectedStatus { status: 500, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_forbidden_is_not_transient() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = client(&server, EmbedOptions::new("http://example.com/1"));
    let err = client.fetch().await.unwrap_err();
    assert!(matches!(err, OEmbedError::UnexpectedStatus { status: 403, .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"type\": \"vid"))
        .mount(&server)
        .await;

    let client = client(&server, EmbedOptions::new("http://example.com/1"));
    let err = client.fetch().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(video_response())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let transport =
        ReqwestTransport::new(&TransportConfig::default().with_timeout(Duration::from_millis(50)))
            .unwrap();
    let client = OEmbed::new(
        EmbedOptions::new("http://example.com/slow").with_providers(providers(&server, true)),
        transport,
    )
    .unwrap();
    let err = client.fetch().await.unwrap_err();
    assert!(matches!(err, OEmbedError::Transport(TransportError::Timeout { .. })));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_configured_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "ohembed-test"))
        .and(header("accept-language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_response()))
        .expect(1)
        .mount(&server)
        .await;

    let config = TransportConfig::default()
        .with_user_agent("ohembed-test")
        .with_header("Accept-Language", "en");
    let client = OEmbed::new(
        EmbedOptions::new("http://example.com/1").with_providers(providers(&server, true)),
        ReqwestTransport::new(&config).unwrap(),
    )
    .unwrap();
    assert!(client.fetch().await.unwrap().is_some());
}

#[tokio::test]
async fn test_shared_client_is_reused() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "shared-app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_response()))
        .expect(2)
        .mount(&server)
        .await;

    let shared = reqwest::Client::builder()
        .user_agent("shared-app")
        .build()
        .unwrap();
    for target in ["http://example.com/1", "http://example.com/2"] {
        let client = OEmbed::new(
            EmbedOptions::new(target).with_providers(providers(&server, true)),
            ReqwestTransport::from_client(shared.clone()),
        )
        .unwrap();
        assert!(client.fetch().await.unwrap().is_some());
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let providers = ProviderRegistry::new()
        .with_provider(
            "example.com",
            ProviderDescriptor::new("http://127.0.0.1:9/oembed", true),
        )
        .unwrap();
    let client = OEmbed::new(
        EmbedOptions::new("http://example.com/1").with_providers(providers),
        ReqwestTransport::new(&TransportConfig::default().with_timeout(Duration::from_secs(2)))
            .unwrap(),
    )
    .unwrap();
    let err = client.fetch().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

/// Hits the real Vimeo endpoint; run with `cargo test -- --ignored`.
#[tokio::test]
#[ignore = "requires network access"]
async fn test_live_vimeo() {
    let transport = ReqwestTransport::new(
        &TransportConfig::default().with_timeout(Duration::from_secs(15)),
    )
    .unwrap();
    let client = OEmbed::new(EmbedOptions::new("http://vimeo.com/6382511"), transport).unwrap();
    let embed = client.fetch().await.unwrap().expect("embed data");
    assert_eq!(embed.get_str("type"), Some("video"));
}
