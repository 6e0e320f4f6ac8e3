// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Find the documents to check and the links inside them
// 3. Check every document's links (documents run concurrently too)
// 4. Print the results and exit with a proper code
//    (0 = all good, 1 = broken links, 2 = error)
//
// A document that cannot be read is reported on its own; the other
// documents are still checked and printed.
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use futures::future::join_all;
use linkwatch::documents::{collect_documents, read_document};
use linkwatch::extract::extract_links;
use linkwatch::{AnchorCache, CheckerConfig, ConcurrencyGate, LinkChecker, LinkResult};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

// The #[tokio::main] attribute transforms our async main into a real main function
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// All links checked for one document
struct DocumentResults {
    document: PathBuf,
    results: Vec<LinkResult>,
    // Set when the document itself could not be read
    error: Option<String>,
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Ok(2) = some document could not be read
//   Err = something went wrong before checking
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    linkwatch::logging::init(cli.verbose)?;

    let checker = build_checker(&cli)?;
    let documents = collect_documents(&cli.paths, cli.recursive)?;
    tracing::debug!(documents = documents.len(), "collected documents");

    let checks = documents.into_iter().map(|document| {
        let checker = checker.clone();
        async move { check_document(&checker, document).await }
    });
    let reports = join_all(checks).await;

    if cli.json {
        print_json(&reports)?;
    } else {
        print_table(&reports, cli.verbose);
    }

    let unreadable = reports.iter().any(|report| report.error.is_some());
    let broken = reports
        .iter()
        .flat_map(|report| &report.results)
        .any(|result| !result.is_ok());

    Ok(if unreadable {
        2
    } else if broken {
        1
    } else {
        0
    })
}

fn build_checker(cli: &Cli) -> Result<LinkChecker> {
    let gate = Arc::new(ConcurrencyGate::new(cli.concurrency));

    let mut config = CheckerConfig::new(gate).with_timeout(Duration::from_secs(cli.timeout));
    if let Some(root) = &cli.document_root {
        config = config.with_document_root(root);
    }
    if let Some(pattern) = &cli.exclude {
        let pattern = Regex::new(pattern)
            .with_context(|| format!("Invalid exclusion pattern '{}'", pattern))?;
        config = config.with_exclude(pattern);
    }

    LinkChecker::new(config, Arc::new(AnchorCache::new())).context("Failed to create HTTP client")
}

async fn check_document(checker: &LinkChecker, document: PathBuf) -> DocumentResults {
    let content = match read_document(&document).await {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(document = %document.display(), "{:#}", e);
            return DocumentResults {
                document,
                results: Vec::new(),
                error: Some(format!("{:#}", e)),
            };
        }
    };

    let links = extract_links(&document, &content);
    let mut results = checker.check_all(links, &document).await;
    // Results arrive in completion order; sort for a stable report.
    results.sort_by(|a, b| a.reference.cmp(&b.reference));

    DocumentResults {
        document,
        results,
        error: None,
    }
}

// Prints results as a human-readable table in the terminal
fn print_table(reports: &[DocumentResults], verbose: bool) {
    for report in reports {
        let broken: Vec<_> = report.results.iter().filter(|r| !r.is_ok()).collect();
        if broken.is_empty() && report.error.is_none() && !verbose {
            continue;
        }

        println!("📄 {}", report.document.display());
        if let Some(error) = &report.error {
            println!("   ⚠️  {}", error);
        }
        for result in &report.results {
            match result.error() {
                Some(error) => println!("   ❌ {}\n      {}", result.reference, error),
                None if verbose => println!("   ✅ {}", result.reference),
                None => {}
            }
        }
        println!();
    }

    let total: usize = reports.iter().map(|r| r.results.len()).sum();
    let broken = reports
        .iter()
        .flat_map(|r| &r.results)
        .filter(|r| !r.is_ok())
        .count();

    let unreadable = reports.iter().filter(|r| r.error.is_some()).count();

    println!("📊 Summary:");
    println!("   📄 Documents: {}", reports.len());
    if unreadable > 0 {
        println!("   ⚠️  Unreadable: {}", unreadable);
    }
    println!("   ✅ OK: {}", total - broken);
    println!("   ❌ Broken: {}", broken);
    println!("   📋 Total: {}", total);
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    document: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    links: Vec<JsonLink<'a>>,
}

#[derive(Serialize)]
struct JsonLink<'a> {
    url: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

fn print_json(reports: &[DocumentResults]) -> Result<()> {
    let documents: Vec<_> = reports
        .iter()
        .map(|report| JsonDocument {
            document: &report.document,
            error: report.error.as_deref(),
            links: report
                .results
                .iter()
                .map(|result| JsonLink {
                    url: &result.reference,
                    status: if result.is_ok() { "ok" } else { "broken" },
                    error: result.error().map(|e| e.kind()),
                    message: result.error().map(|e| e.to_string()),
                })
                .collect(),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&documents)?);
    Ok(())
}
