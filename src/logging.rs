// src/logging.rs
// =============================================================================
// Sets up the global tracing subscriber.
//
// Log lines go to stderr: stdout is reserved for the crawl output (one URL
// per line, or JSON) so it can be piped into other tools.
//
// RUST_LOG still works and is combined with the level picked here.
// =============================================================================

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging(debug: bool) -> Result<()> {
    let env_filter = if debug {
        EnvFilter::from_default_env()
            .add_directive("web_crawler=debug".parse()?)
            .add_directive("warn".parse()?)
    } else {
        EnvFilter::from_default_env()
            .add_directive("web_crawler=info".parse()?)
            .add_directive("warn".parse()?)
    };

    let fmt_layer = fmt::layer()
        .with_target(debug)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
