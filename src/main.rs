//! Archive-Harvest main entry point
//!
//! This is the command-line interface for the Archive-Harvest snapshot harvester.

use anyhow::Context;
use archive_harvest::config::{load_config_with_hash, Config, FetcherKind};
use archive_harvest::crawler::crawl;
use archive_harvest::mirror::{mirror, wget_args};
use archive_harvest::output::print_statistics;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Archive-Harvest: a polite snapshot harvester
///
/// Archive-Harvest walks a web-archive snapshot of one site, saving page
/// markup, downloading embedded images and following links that stay under
/// the configured origin prefix, one request at a time.
#[derive(Parser, Debug)]
#[command(name = "archive-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite snapshot harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long, conflicts_with = "mirror")]
    dry_run: bool,

    /// Mirror the site with wget instead of the built-in harvester
    #[arg(long, conflicts_with_all = ["dry_run", "rendered"])]
    mirror: bool,

    /// Render pages in a headless browser (overrides `crawler.fetcher`)
    #[arg(long)]
    rendered: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).context(format!("loading {}", cli.config.display()));
        }
    };

    if cli.rendered {
        config.crawler.fetcher = FetcherKind::Rendered;
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.mirror {
        handle_mirror(&config).await?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("archive_harvest=info,warn"),
            1 => EnvFilter::new("archive_harvest=debug,info"),
            2 => EnvFilter::new("archive_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config) {
    println!("=== Archive-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed: {}", config.crawler.seed);
    println!("  Origin prefix: {}", config.crawler.origin_prefix());
    println!("  Traversal: {:?}", config.crawler.traversal);
    println!("  Fetcher: {:?}", config.crawler.fetcher);
    println!("  Resource delay: {}ms", config.crawler.resource_delay_ms);
    println!("  Page delay: {}ms", config.crawler.page_delay_ms);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);

    println!("\nOutput:");
    println!("  HTML: {}", config.output.html_dir);
    println!("  Images: {}", config.output.image_dir);
    match &config.output.image_links_file {
        Some(path) => println!("  Image links: {}", path),
        None => println!("  Image links: <html dir>/image_links.txt"),
    }
    println!("  Collision policy: {:?}", config.output.collision);

    println!("\nMirror command:");
    println!(
        "  {} {}",
        config.mirror.wget_path,
        wget_args(&config.mirror, &config.crawler.seed).join(" ")
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the --mirror mode
async fn handle_mirror(config: &Config) -> anyhow::Result<()> {
    let code = mirror(config).await?;
    println!(
        "wget finished ({})",
        code.map_or("terminated by signal".to_string(), |c| format!("exit code {}", c))
    );
    Ok(())
}

/// Handles the main harvest operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Harvesting {} (html: {}, images: {})",
        config.crawler.seed,
        config.output.html_dir,
        config.output.image_dir
    );

    match crawl(config).await {
        Ok(stats) => {
            tracing::info!("Harvest completed successfully");
            print_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
