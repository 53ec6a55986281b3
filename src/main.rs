//! Crawl-Relay main entry point
//!
//! This is the command-line interface for driving the remote crawl service,
//! sending result summaries by email, and inspecting the tool surface.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use crawl_relay::config::{load_config_with_hash, Config};
use crawl_relay::crawler::{crawl_urls, CrawlClient, FetchRequest};
use crawl_relay::mail::MailClient;
use crawl_relay::output::{print_statistics, write_batch_summary, BatchStatistics};
use crawl_relay::tools::ToolRegistry;
use crawl_relay::{parse_target_list, BatchResponse, UrlRef};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Crawl-Relay: a resilient client for a remote page-crawling service
///
/// Fetches pages through a remote browser-automation service with bounded
/// retries, crawls URL lists with randomized pacing, and emails summaries.
#[derive(Parser, Debug)]
#[command(name = "crawl-relay")]
#[command(version)]
#[command(about = "A resilient client for a remote page-crawling service", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a single URL and print the outcome as JSON
    Crawl {
        url: String,

        /// CSS selector limiting what the service extracts
        #[arg(long)]
        selector: Option<String>,

        /// Ask the service not to pace its browser actions
        #[arg(long)]
        no_delays: bool,

        /// Reuse an existing browsing session
        #[arg(long)]
        session_id: Option<String>,

        /// Attempts before giving up (defaults to the configured value)
        #[arg(long)]
        max_retries: Option<u32>,
    },

    /// Crawl several URLs sequentially and print the batch report as JSON
    Batch {
        /// URLs to crawl
        urls: Vec<String>,

        /// Read targets from a file (JSON list or one URL per line)
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// CSS selector applied to every page
        #[arg(long)]
        selector: Option<String>,

        /// Base delay between URLs in seconds
        #[arg(long)]
        delay: Option<f64>,

        /// Also write a markdown summary to this path
        #[arg(long, value_name = "PATH")]
        summary: Option<PathBuf>,

        /// Print statistics instead of the JSON report
        #[arg(long)]
        stats: bool,
    },

    /// Send an email through the configured mailbox API
    SendEmail {
        #[arg(long)]
        to: String,

        #[arg(long)]
        subject: String,

        #[arg(long, conflicts_with = "body_file", required_unless_present = "body_file")]
        body: Option<String>,

        #[arg(long, value_name = "PATH")]
        body_file: Option<PathBuf>,
    },

    /// List tool definitions as JSON
    Tools,

    /// Validate config and show what would be used without contacting any service
    DryRun,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    match cli.command {
        Command::Crawl {
            url,
            selector,
            no_delays,
            session_id,
            max_retries,
        } => handle_crawl(&config, url, selector, !no_delays, session_id, max_retries).await,
        Command::Batch {
            urls,
            file,
            selector,
            delay,
            summary,
            stats,
        } => handle_batch(&config, urls, file, selector, delay, summary, stats).await,
        Command::SendEmail {
            to,
            subject,
            body,
            body_file,
        } => handle_send_email(&config, &to, &subject, body, body_file).await,
        Command::Tools => handle_tools(&config),
        Command::DryRun => {
            handle_dry_run(&config);
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawl_relay=info,warn"),
            1 => EnvFilter::new("crawl_relay=debug,info"),
            2 => EnvFilter::new("crawl_relay=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn handle_crawl(
    config: &Config,
    url: String,
    selector: Option<String>,
    add_delays: bool,
    session_id: Option<String>,
    max_retries: Option<u32>,
) -> anyhow::Result<()> {
    let client = CrawlClient::new(&config.crawler_service, &config.user_agent)?;
    let request = FetchRequest::new(url)
        .with_selector(selector)
        .with_add_delays(add_delays)
        .with_session_id(session_id);

    let outcome = client
        .fetch(&request, max_retries.unwrap_or_else(|| client.max_retries()))
        .await;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

async fn handle_batch(
    config: &Config,
    urls: Vec<String>,
    file: Option<PathBuf>,
    selector: Option<String>,
    delay: Option<f64>,
    summary: Option<PathBuf>,
    stats: bool,
) -> anyhow::Result<()> {
    let mut targets: Vec<UrlRef> = urls.into_iter().map(UrlRef::from).collect();
    if let Some(path) = file {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read targets from {}", path.display()))?;
        targets.extend(parse_target_list(&text)?);
    }

    let mut config = config.clone();
    if let Some(delay) = delay {
        if !delay.is_finite() || delay < 0.0 {
            bail!("--delay must be >= 0, got {}", delay);
        }
        config.batch.delay_between_urls = delay;
    }

    tracing::info!("Crawling {} target(s)", targets.len());
    let response = crawl_urls(&config, &targets, selector.as_deref()).await?;

    if let BatchResponse::Completed(report) = &response {
        if let Some(path) = &summary {
            write_batch_summary(report, path)
                .with_context(|| format!("Failed to write summary {}", path.display()))?;
            tracing::info!("Summary written to: {}", path.display());
        }
        if stats {
            print_statistics(&BatchStatistics::from_report(report));
            return Ok(());
        }
    }

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn handle_send_email(
    config: &Config,
    to: &str,
    subject: &str,
    body: Option<String>,
    body_file: Option<PathBuf>,
) -> anyhow::Result<()> {
    let Some(mail) = &config.mail else {
        bail!("No [mail] section in configuration");
    };

    let body = match (body, body_file) {
        (Some(body), _) => body,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read body from {}", path.display()))?,
        (None, None) => bail!("Either --body or --body-file is required"),
    };

    let client = MailClient::from_env(mail, &config.user_agent)?;
    let receipt = client.send(to, subject, &body).await?;

    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}

fn handle_tools(config: &Config) -> anyhow::Result<()> {
    let registry = ToolRegistry::from_config(config)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&registry.get_tool_definitions())?
    );
    Ok(())
}

/// Handles the dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Crawl-Relay Dry Run ===\n");

    println!("Crawl Service:");
    println!("  Base URL: {}", config.crawler_service.base_url);
    println!("  Timeout: {}s", config.crawler_service.timeout_secs);
    println!("  Max retries: {}", config.crawler_service.max_retries);

    println!("\nBatch Pacing:");
    println!(
        "  Delay between URLs: {}s (±{}s)",
        config.batch.delay_between_urls, config.batch.pacing_jitter
    );

    println!("\nUser Agent: {}", config.user_agent.header_value());

    match &config.mail {
        Some(mail) => {
            println!("\nMail:");
            println!("  API base: {}", mail.api_base);
            println!("  User: {}", mail.user_id);
            println!("  Token variable: {}", mail.access_token_env);
        }
        None => println!("\nMail: not configured"),
    }

    println!("\n✓ Configuration is valid");
}
