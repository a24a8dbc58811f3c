// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Crawl every seed URL (a few at a time) and print what was visited
// 4. Exit with proper code:
//      0 = at least one seed was crawled
//      1 = no seed URLs given, help requested, or bad arguments
//      2 = every seed failed to start (bad URL) or an internal error
//
// Ctrl-C stops all running crawls; whatever was visited so far is printed.
// =============================================================================

mod cli;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use cli::Cli;
use web_crawler::{logging, CrawlReport, Crawler};

// How many seeds are crawled at the same time; each one has its own pool
const SEED_CONCURRENCY: usize = 4;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("web-crawler: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            e.print()?;
            return Ok(code);
        }
    };

    if cli.urls.is_empty() {
        Cli::command().print_help()?;
        return Ok(1);
    }

    logging::init_logging(cli.debug)?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, stopping crawl");
            on_ctrl_c.cancel();
        }
    });

    let config = cli.crawl_config();
    tracing::debug!(?config, "crawl settings");

    // buffered (not buffer_unordered) so reports come out in seed order
    let outcomes: Vec<_> = stream::iter(cli.urls.iter())
        .map(|seed| {
            let config = config.clone();
            let cancel = cancel.clone();
            async move {
                // One Crawler per seed: separate HTTP session and cookie jar
                let crawler = Crawler::new(config)?;
                crawler.run_until_cancelled(seed, cancel).await
            }
        })
        .buffered(SEED_CONCURRENCY)
        .collect()
        .await;

    let mut completed = 0;
    for (seed, outcome) in cli.urls.iter().zip(outcomes) {
        match outcome {
            Ok(report) => {
                print_report(&report, cli.json)?;
                completed += 1;
            }
            Err(e) => {
                tracing::error!("skipping {}: {}", seed, e);
            }
        }
    }

    if completed > 0 {
        Ok(0)
    } else {
        Ok(2)
    }
}

fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        for url in &report.visited {
            println!("{}", url);
        }
    }

    tracing::info!(
        failed = report.failures.len(),
        cancelled = report.cancelled,
        "crawled through {} items from {}",
        report.visited.len(),
        report.seed
    );
    Ok(())
}
