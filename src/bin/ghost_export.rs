//! ghost-export - pull content out of a Ghost-style CMS from the terminal.
//!
//! Thin CLI glue over the `ghost_api` composer: everything here just
//! configures credentials and drives the public operations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::Level;

use ghost_api::config::Config;
use ghost_api::{
    ApiComposer, ApiOutcome, BrowseParams, CachedTokenProvider, Credentials, Limit,
    StaticTokenProvider,
};

/// Export posts and members from a Ghost-style CMS
#[derive(Parser, Debug)]
#[command(name = "ghost-export", version, about, long_about = None)]
struct Args {
    /// Site origin, e.g. https://demo.ghost.io
    #[arg(short, long)]
    url: Option<String>,

    /// Content API key
    #[arg(long)]
    content_key: Option<String>,

    /// Pre-signed admin token
    #[arg(long)]
    admin_token: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export all posts as JSON (content endpoint)
    Posts {
        /// Filter expression, e.g. 'featured:true'
        #[arg(short, long)]
        filter: Option<String>,

        /// Order expression, e.g. 'published_at DESC'
        #[arg(short, long)]
        order: Option<String>,

        /// Page size (positive integer or 'all')
        #[arg(short, long)]
        limit: Option<String>,
    },
    /// List all members as JSON (admin endpoint)
    Members,
    /// Save connection settings for later runs
    Init,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// Log to a file: stdout is the export stream.
fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .expect("Failed to open log file");

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .init();

    tracing::info!("ghost-export started with log level: {:?}", level);
    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("ghost-export").join("ghost-export.log");
    }
    PathBuf::from("ghost-export.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = setup_logging(args.log_level);

    let config = Config::load();
    let url = config
        .effective_url(args.url.as_deref())
        .context("No site URL configured. Use --url or run 'ghost-export init'")?;

    match args.command {
        Command::Posts {
            filter,
            order,
            limit,
        } => {
            let key = config
                .effective_content_key(args.content_key.as_deref())
                .context("No content key configured. Use --content-key or 'ghost-export init'")?;
            let credentials = Credentials::content(&url, key)?;
            let posts = ApiComposer::for_resource("posts", credentials)?;

            let mut params = BrowseParams::new();
            if let Some(filter) = filter {
                params = params.filter(filter);
            }
            if let Some(order) = order {
                params = params.order(order);
            }
            if let Some(limit) = limit {
                params = params.limit(parse_limit(&limit)?);
            }

            let all = fetch_all(posts.browse(Some(params))?).await?;
            println!("{}", serde_json::to_string_pretty(&all)?);
        }
        Command::Members => {
            let token = config
                .effective_admin_token(args.admin_token.as_deref())
                .context("No admin token configured. Use --admin-token or 'ghost-export init'")?;
            let provider = Arc::new(CachedTokenProvider::new(Arc::new(
                StaticTokenProvider::new(token),
            )));
            let credentials = Credentials::admin(&url, provider)?;
            let members = ApiComposer::for_resource("members", credentials)?;

            let all = fetch_all(members.browse(None)?).await?;
            println!("{}", serde_json::to_string_pretty(&all)?);
        }
        Command::Init => {
            let updated = Config {
                site_url: Some(url.clone()),
                content_key: config.effective_content_key(args.content_key.as_deref()),
                admin_token: config.effective_admin_token(args.admin_token.as_deref()),
            };
            updated.save()?;
            eprintln!("Saved configuration for {url}");
        }
    }

    Ok(())
}

fn parse_limit(raw: &str) -> Result<Limit> {
    if raw == "all" {
        return Ok(Limit::All);
    }
    let n: u32 = raw.parse().context("limit must be a number or 'all'")?;
    Ok(Limit::Count(n))
}

/// Drive the cursor across every page, collecting entities. Server-declared
/// failures abort the export with their messages.
async fn fetch_all(fetcher: ghost_api::BrowseFetcher) -> Result<Vec<Value>> {
    let resource = fetcher.resource().to_string();
    let mut all = Vec::new();
    let mut cursor = fetcher.paginate().await?;
    loop {
        match &cursor.current {
            ApiOutcome::Success(page) => {
                tracing::debug!("fetched {} {} entities", page.len(), resource);
                all.extend(page.iter().cloned());
            }
            ApiOutcome::Failure(errors) => {
                let messages: Vec<&str> =
                    errors.iter().map(|e| e.message.as_str()).collect();
                bail!("server rejected the request: {}", messages.join("; "));
            }
        }
        match cursor.next().await? {
            Some(next) => cursor = next,
            None => break,
        }
    }
    Ok(all)
}
