//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Download a market-data archive, resuming a partial file when present.
///
/// The file is named after the URL's final path segment and saved into the
/// destination directory. Re-running the same command continues an
/// interrupted transfer instead of restarting it.
#[derive(Parser, Debug)]
#[command(name = "market-data-loader")]
#[command(author, version, about)]
pub struct Args {
    /// Link to the file to download
    pub file_link: String,

    /// Destination directory (must exist; defaults to the current directory)
    #[arg(short = 'd', long)]
    pub dest: Option<PathBuf>,

    /// Speed limit in kilobytes per second (0 uses the default limit of 1000)
    #[arg(short = 'l', long, default_value_t = 0, value_parser = clap::value_parser!(u64).range(0..=1_000_000))]
    pub limit_kb: u64,

    /// Download at full speed, ignoring any speed limit
    #[arg(long, conflicts_with = "limit_kb")]
    pub unlimited: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_file_link() {
        let result = Args::try_parse_from(["market-data-loader"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_defaults() {
        let args =
            Args::try_parse_from(["market-data-loader", "https://example.test/a.zip"]).unwrap();
        assert_eq!(args.file_link, "https://example.test/a.zip");
        assert_eq!(args.dest, None);
        assert_eq!(args.limit_kb, 0);
        assert!(!args.unlimited);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_limit_flag() {
        let args = Args::try_parse_from([
            "market-data-loader",
            "https://example.test/a.zip",
            "-l",
            "5000",
        ])
        .unwrap();
        assert_eq!(args.limit_kb, 5000);
    }

    #[test]
    fn test_cli_unlimited_conflicts_with_limit() {
        let result = Args::try_parse_from([
            "market-data-loader",
            "https://example.test/a.zip",
            "--unlimited",
            "--limit-kb",
            "100",
        ]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_dest_flag() {
        let args = Args::try_parse_from([
            "market-data-loader",
            "https://example.test/a.zip",
            "--dest",
            "/tmp/archives",
        ])
        .unwrap();
        assert_eq!(args.dest, Some(PathBuf::from("/tmp/archives")));
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args =
            Args::try_parse_from(["market-data-loader", "https://example.test/a.zip", "-vv"])
                .unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let result = Args::try_parse_from(["market-data-loader", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
