//! # helpcenter CLI Application
//!
//! This module implements the command-line interface for the help-center
//! crawler.
//!
//! ## Key Components
//!
//! - CLI argument parsing with clap
//! - Subcommands:
//!   - `crawl`: Walk a help center from a seed category and save it as JSON
//!   - `stats`: Summarize a previously saved crawl
//!   - `export`: Flatten a saved crawl into one record per article
//!
//! ## Features
//!
//! - Configurable site origin, politeness delay and pagination bound
//! - Progress spinner while crawling
//! - Telemetry integration (console, optional log file, optional OTLP)

mod telemetry;

use clap::{Args, Parser, Subcommand};
use helpcenter::crawler::{
    CrawlProgress, CrawlerConfig, DEFAULT_BASE_URL, DEFAULT_SEED_URL, HelpCenterCrawler,
    HttpFetcher, storage,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use telemetry::OtelGuard;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

#[derive(Parser)]
#[command(author, version, about = "Crawl a help center into a single JSON document", long_about = None)]
struct Cli {
    /// Export traces and metrics over OTLP
    #[arg(long, global = true)]
    otel: bool,

    /// Also write logs to helpcenter.log in this directory
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl a help center starting from a category page
    Crawl(CrawlArgs),

    /// Show counts for a saved crawl
    Stats(StatsArgs),

    /// Write a saved crawl as a flat list of articles
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Category page to start from
    #[arg(default_value = DEFAULT_SEED_URL)]
    url: String,

    /// Site origin used to resolve relative links
    #[arg(short, long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Minimum delay between requests in milliseconds
    #[arg(short, long, default_value = "1000")]
    delay_ms: u64,

    /// Listing pages read per subcategory, first page included (0 = all)
    #[arg(short = 'p', long, default_value = "2")]
    max_listing_pages: u32,

    /// User agent sent with every request
    #[arg(short, long)]
    user_agent: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value = "30")]
    timeout_secs: u64,

    /// CSS selector of the article content region
    #[arg(short, long)]
    content_selector: Option<String>,

    /// Extra CSS selectors stripped from article content (comma-separated)
    #[arg(short, long)]
    exclude: Option<String>,

    /// Where to save the crawl
    #[arg(short, long, default_value = "aycl_knowledge_base.json")]
    output: PathBuf,

    /// Also save a flat article list here
    #[arg(short, long)]
    flat: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// Saved crawl to read
    #[arg(required = true)]
    input: PathBuf,

    /// Show a per-subcategory breakdown
    #[arg(short, long)]
    details: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Saved crawl to read
    #[arg(required = true)]
    input: PathBuf,

    /// Where to write the flat article list
    #[arg(short, long, default_value = "support-articles.json")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let _otel: OtelGuard =
        telemetry::init_tracing_subscriber(cli.otel, cli.log_file.as_deref())?;

    match cli.command {
        Some(Commands::Crawl(args)) => {
            crawl_command(args).await?;
        }
        Some(Commands::Stats(args)) => {
            stats_command(args).await?;
        }
        Some(Commands::Export(args)) => {
            export_command(args).await?;
        }
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["helpcenter", "--help"]);
        }
    }

    Ok(())
}

#[instrument]
async fn crawl_command(args: CrawlArgs) -> anyhow::Result<()> {
    println!("Crawling {}...", args.url);

    let mut builder = CrawlerConfig::builder()
        .base_url(args.base_url)
        .delay_ms(args.delay_ms)
        .max_listing_pages(args.max_listing_pages)
        .request_timeout_secs(args.timeout_secs)
        .extra_noise_selectors(
            args.exclude
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        );
    if let Some(user_agent) = args.user_agent {
        builder = builder.user_agent(user_agent);
    }
    if let Some(content_selector) = args.content_selector {
        builder = builder.content_selector(content_selector);
    }
    let config = builder.build();

    let (progress_sender, mut progress_receiver) = mpsc::unbounded_channel();
    let fetcher = HttpFetcher::new(&config)?;
    let crawler = HelpCenterCrawler::new(fetcher, config)?.with_progress(progress_sender);
    info!(
        "Crawling with {} ms between requests, up to {} listing pages per section",
        crawler.config().delay_ms,
        crawler.config().max_listing_pages
    );

    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} [{elapsed_precise}] {pos} articles {msg}")?,
    );
    progress_bar.enable_steady_tick(Duration::from_millis(120));

    // Spawn a task to process progress updates
    let progress_handle = tokio::spawn({
        let progress_bar = progress_bar.clone();
        async move {
            while let Some(progress) = progress_receiver.recv().await {
                match progress {
                    CrawlProgress::Category(url) => {
                        progress_bar.set_message(format!("category {}", url))
                    }
                    CrawlProgress::Subcategory(url) => {
                        progress_bar.set_message(format!("section {}", url))
                    }
                    CrawlProgress::Article(_) => progress_bar.inc(1),
                }
            }
            progress_bar.finish_and_clear();
        }
    });

    let result = crawler.crawl(&args.url).await;

    // Dropping the crawler closes the channel and ends the progress task
    drop(crawler);
    if let Err(e) = progress_handle.await {
        warn!("Progress task failed: {}", e);
    }
    let result = result?;

    storage::write_result(&args.output, &result).await?;
    println!("Crawling complete. Data saved to {}", args.output.display());

    if let Some(flat_path) = args.flat {
        storage::write_flat(&flat_path, &storage::flatten(&result)).await?;
        println!("Saved flat article list to {}", flat_path.display());
    }

    println!("Total categories: {}", result.category_count());
    println!("Total articles: {}", result.article_count());

    Ok(())
}

#[instrument]
async fn stats_command(args: StatsArgs) -> anyhow::Result<()> {
    let result = storage::read_result(&args.input).await?;

    println!("Total categories: {}", result.category_count());
    println!("Total subcategories: {}", result.subcategory_count());
    println!("Total articles: {}", result.article_count());

    if args.details {
        for category in &result.categories {
            println!();
            println!("{} ({})", category.title, category.url);
            for subcategory in &category.subcategories {
                println!(
                    "  {} - {} articles",
                    subcategory.title,
                    subcategory.articles.len()
                );
            }
        }
    }

    Ok(())
}

#[instrument]
async fn export_command(args: ExportArgs) -> anyhow::Result<()> {
    let result = storage::read_result(&args.input).await?;
    let articles = storage::flatten(&result);

    storage::write_flat(&args.output, &articles).await?;
    println!(
        "Exported {} articles to {}",
        articles.len(),
        args.output.display()
    );

    Ok(())
}
