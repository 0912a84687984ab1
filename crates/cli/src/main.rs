// ABOUTME: CLI for resolving link previews with the linkcard preview core.
// ABOUTME: Fetches each token (or reads a local HTML file) and prints reconciled metadata as JSON.

mod fetch;
mod settings;

use std::convert::Infallible;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use linkcard_preview::{normalize, CacheBuilder, LinkPreviewer, Metadata, Preview};
use serde::Serialize;
use tracing::info;

use crate::fetch::PageFetcher;
use crate::settings::Settings;

/// Resolve social preview metadata for links and output JSON.
#[derive(Parser, Debug)]
#[command(name = "linkcard")]
#[command(about = "Resolve link preview metadata and print JSON", long_about = None)]
struct Args {
    /// Tokens to preview. Trailing "." or "," is ignored; non-http(s) tokens are reported as not_a_link.
    #[arg()]
    tokens: Vec<String>,

    /// HTML file to extract from instead of fetching (requires --url)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// URL the --html file was fetched from
    #[arg(long = "url")]
    url: Option<String>,

    /// JSON settings file (maxSize, ttlMs, retryThreshold, corsProxyUrl)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Prefix requests with a CORS proxy, e.g. https://proxy.example
    #[arg(long = "cors-proxy")]
    cors_proxy: Option<String>,

    /// Cache capacity (overrides the settings file)
    #[arg(long = "max-size")]
    max_size: Option<usize>,

    /// Cache entry lifetime in milliseconds (overrides the settings file)
    #[arg(long = "ttl-ms")]
    ttl_ms: Option<u64>,

    /// Consecutive failures before a URL is no longer fetched (overrides the settings file)
    #[arg(long = "retry-threshold")]
    retry_threshold: Option<u32>,

    /// Request timeout in seconds
    #[arg(long = "timeout", default_value_t = 10)]
    timeout_secs: u64,

    /// Log level used when RUST_LOG is unset
    #[arg(long = "log-level", default_value = "warn")]
    log_level: String,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Resolved,
    LinkOnly,
    NotALink,
}

#[derive(Debug, Serialize)]
struct Record {
    token: String,
    url: Option<String>,
    status: Status,
    metadata: Option<Metadata>,
}

impl Record {
    fn new(token: &str, preview: Option<Preview>) -> Self {
        match preview {
            None => Self {
                token: token.to_string(),
                url: None,
                status: Status::NotALink,
                metadata: None,
            },
            Some(Preview { url, metadata }) => Self {
                token: token.to_string(),
                url: Some(url),
                status: if metadata.is_some() {
                    Status::Resolved
                } else {
                    Status::LinkOnly
                },
                metadata,
            },
        }
    }
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_previewer(args: &Args, settings: &Settings) -> Result<LinkPreviewer> {
    let mut builder = CacheBuilder::from_options(settings.cache.clone());
    if let Some(max_size) = args.max_size {
        builder = builder.max_size(max_size);
    }
    if let Some(ttl_ms) = args.ttl_ms {
        builder = builder.ttl(Duration::from_millis(ttl_ms));
    }
    if let Some(retry_threshold) = args.retry_threshold {
        builder = builder.retry_threshold(retry_threshold);
    }
    Ok(LinkPreviewer::new(builder.build()?))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    if args.html.is_some() && args.url.is_none() {
        bail!("--url is required when using --html");
    }
    if args.html.is_none() && args.tokens.is_empty() {
        bail!("at least one token is required, or use --html with --url");
    }
    if args.html.is_some() && !args.tokens.is_empty() {
        bail!("cannot use both --html and positional tokens");
    }

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let mut previewer = build_previewer(&args, &settings)?;

    let mut records = Vec::new();

    if let (Some(html_path), Some(url)) = (&args.html, &args.url) {
        if normalize(url).is_none() {
            bail!("--url must be an http or https URL: {}", url);
        }
        let html = fs::read_to_string(html_path)
            .with_context(|| format!("failed to read HTML file {}", html_path.display()))?;
        let preview = previewer.preview_with(url, |_| Ok::<_, Infallible>(html.clone()));
        records.push(Record::new(url, preview));
    } else {
        let proxy = args.cors_proxy.clone().or(settings.cors_proxy_url.clone());
        let fetcher = PageFetcher::new(proxy, Duration::from_secs(args.timeout_secs))?;

        for token in &args.tokens {
            let preview = previewer.preview_with(token, |url| {
                info!(url, "fetching page");
                fetcher.fetch(url)
            });
            records.push(Record::new(token, preview));
        }
    }

    if args.compact {
        println!("{}", serde_json::to_string(&records)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    Ok(())
}
