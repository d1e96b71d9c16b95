//! CLI entry point for the market-data-loader tool.

use anyhow::Result;
use clap::Parser;
use market_data_loader::{ConsoleNotifier, FileLoader, Notifier};
use tracing::{debug, info};

mod cli;

use cli::Args;

/// Tag used for console notifications.
const APP_NAME: &str = "market-data-loader";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    // Destination defaults to the current working directory.
    let dest_dir = match args.dest {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let loader = if args.unlimited {
        debug!("using unthrottled loader");
        FileLoader::unthrottled()
    } else {
        // CLI takes kilobytes/second; the engine wants bytes/second.
        // Zero falls through to the engine's default limit.
        debug!(limit_kb = args.limit_kb, "using rate-limited loader");
        FileLoader::rate_limited(args.limit_kb * 1000)
    };

    let notifier = ConsoleNotifier;

    match loader.download(&args.file_link, &dest_dir).await {
        Ok(outcome) => {
            info!(
                path = %outcome.path.display(),
                bytes = outcome.bytes_written,
                mode = ?outcome.mode,
                "done"
            );
            Ok(())
        }
        Err(e) => {
            // Full cause chain via anyhow's alternate formatting.
            let report = anyhow::Error::from(e);
            notifier.notify(APP_NAME, &format!("{report:#}"));
            std::process::exit(1);
        }
    }
}
