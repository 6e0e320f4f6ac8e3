// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The command line is the only source of configuration: everything here
// ends up in a CheckerConfig (see config.rs) or controls the report.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "linkwatch",
    version,
    about = "Checks links and anchors in Markdown and HTML files",
    long_about = "linkwatch checks every link in the given Markdown and HTML documents: \
                  remote URLs must answer, local files must exist, and #anchors must be \
                  defined in the document they point into. \
                  Exit code 0 means all links are fine, 1 means broken links were found."
)]
pub struct Cli {
    /// Markdown or HTML files to check (directories need --recursive)
    ///
    /// Example: linkwatch README.md docs/guide.md
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Maximum number of simultaneous HTTP requests
    #[arg(short, long, default_value_t = linkwatch::config::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Directory that root-absolute links like "/docs/x.md" are resolved against
    #[arg(short, long, value_name = "DIR")]
    pub document_root: Option<PathBuf>,

    /// Search directories for Markdown and HTML files
    #[arg(short, long)]
    pub recursive: bool,

    /// Timeout for each HTTP request in seconds (0 = no timeout)
    #[arg(short, long, value_name = "SECS", default_value_t = 5)]
    pub timeout: u64,

    /// Regular expression; matching links are never checked
    ///
    /// The pattern is matched against the resolved target: the full URL for
    /// remote links, the file path for local ones.
    #[arg(short = 'x', long, value_name = "REGEX")]
    pub exclude: Option<String>,

    /// Also list links that are fine, and print debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["linkwatch", "README.md"]).unwrap();
        assert_eq!(cli.paths, vec![PathBuf::from("README.md")]);
        assert_eq!(cli.concurrency, 512);
        assert_eq!(cli.timeout, 5);
        assert!(cli.document_root.is_none());
        assert!(!cli.recursive);
        assert!(!cli.json);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "linkwatch", "-r", "-c", "8", "-t", "0", "-d", "site", "-x", "^https://internal", "docs",
        ])
        .unwrap();
        assert!(cli.recursive);
        assert_eq!(cli.concurrency, 8);
        assert_eq!(cli.timeout, 0);
        assert_eq!(cli.document_root, Some(PathBuf::from("site")));
        assert_eq!(cli.exclude.as_deref(), Some("^https://internal"));
    }

    #[test]
    fn test_paths_are_required() {
        assert!(Cli::try_parse_from(["linkwatch"]).is_err());
    }
}
