//! ohembed CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration** — command-line flags with `OHEMBED_*`
//!    environment fallbacks, plus an optional JSON providers file.
//! 2. **Wire observability** — `tracing-subscriber` on stderr and, when an
//!    endpoint is given, an OpenTelemetry OTLP exporter.
//! 3. **Construct infrastructure** — a [`ReqwestTransport`] injected into the
//!    [`OEmbed`] client.
//! 4. **Render** — the decoded payload as pretty JSON on stdout.
//!
//! Exit codes: `0` embed printed, `1` error, `2` provider declined to embed.

mod observability;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use oembed::{EmbedOptions, OEmbed, ProviderRegistry};
use tracing::debug;
use transport::{ReqwestTransport, TransportConfig};

use observability::LogFormat;

const EXIT_DISABLED: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "ohembed", version)]
#[command(about = "Resolve a media URL into its oEmbed representation", long_about = None)]
struct Args {
    /// Media URL to embed (http or https)
    url: String,

    /// Response format to request (json, xml); negotiated when omitted
    #[arg(long, env = "OHEMBED_FORMAT")]
    format: Option<String>,

    /// Extra query parameter forwarded to the provider, e.g. maxwidth=600
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// JSON file replacing the built-in providers: {"domain": {"base": URL, "dot_format": BOOL}}
    #[arg(long, env = "OHEMBED_PROVIDERS")]
    providers: Option<PathBuf>,

    /// Whole-request timeout in seconds (none by default)
    #[arg(long, env = "OHEMBED_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Connect timeout in seconds
    #[arg(long, env = "OHEMBED_CONNECT_TIMEOUT_SECS")]
    connect_timeout_secs: Option<u64>,

    /// User-Agent header
    #[arg(
        long,
        env = "OHEMBED_USER_AGENT",
        default_value = concat!("ohembed/", env!("CARGO_PKG_VERSION"))
    )]
    user_agent: String,

    /// Log line format on stderr
    #[arg(long, value_enum, env = "OHEMBED_LOG_FORMAT", default_value = "pretty")]
    log_format: LogFormat,

    /// OTLP gRPC endpoint for span export
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    otlp_endpoint: Option<String>,

    /// Print the composed request URL and exit without fetching
    #[arg(long)]
    print_request_url: bool,
}

impl Args {
    fn transport_config(&self) -> TransportConfig {
        let mut config = TransportConfig::default().with_user_agent(&self.user_agent);
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.connect_timeout_secs {
            config = config.with_connect_timeout(Duration::from_secs(secs));
        }
        config
    }

    fn embed_options(&self) -> Result<EmbedOptions> {
        let mut options = EmbedOptions::new(&self.url);
        options.format = self.format.clone();
        options.params = self.params.clone();
        if let Some(path) = &self.providers {
            options.providers = Some(load_providers(path)?);
        }
        Ok(options)
    }
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

fn parse_providers(json: &str) -> Result<ProviderRegistry> {
    let registry: ProviderRegistry = serde_json::from_str(json)?;
    anyhow::ensure!(!registry.is_empty(), "providers file defines no providers");
    for (domain, provider) in registry.iter() {
        debug!(%domain, endpoint = %provider.endpoint_base, "Provider loaded");
    }
    Ok(registry)
}

fn load_providers(path: &Path) -> Result<ProviderRegistry> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read providers file {}", path.display()))?;
    parse_providers(&json).with_context(|| format!("invalid providers file {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let _telemetry = observability::init(args.log_format, args.otlp_endpoint.as_deref())?;
    run(&args).await
}

async fn run(args: &Args) -> Result<ExitCode> {
    let transport = ReqwestTransport::new(&args.transport_config())
        .context("failed to configure HTTP transport")?;
    let client = OEmbed::new(args.embed_options()?, transport)
        .with_context(|| format!("cannot embed {}", args.url))?;
    debug!(request_url = client.request_url(), "Request prepared");

    if args.print_request_url {
        println!("{}", client.request_url());
        return Ok(ExitCode::SUCCESS);
    }

    match client
        .fetch()
        .await
        .with_context(|| format!("failed to fetch embed for {}", args.url))?
    {
        Some(embed) => {
            println!("{}", serde_json::to_string_pretty(&embed)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("Embedding disabled by provider for {}", client.url());
            Ok(ExitCode::from(EXIT_DISABLED))
        }
    }
}
