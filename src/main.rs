// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Leakhound CLI - Passive Leak Extraction
//!
//! Scans a live page and its scripts, or fingerprints it.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use url::Url;

use leakhound::{
    capture_page, Category, FingerprintMatcher, HttpClient, HttpClientConfig, LogSink, NullSink,
    ProgressSink, ResultSet, ResultSnapshot, ScanConfig, Session,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("leakhound=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "scan" => {
            if args.len() < 3 {
                eprintln!(
                    "Usage: leakhound scan <url> [--json] [--concurrency N] [--config FILE] [--proxy URL] [--insecure]"
                );
                return ExitCode::from(1);
            }
            scan_site(&args[2], &args[3..]).await
        }
        "fingerprint" => {
            if args.len() < 3 {
                eprintln!("Usage: leakhound fingerprint <url>");
                return ExitCode::from(1);
            }
            fingerprint_site(&args[2]).await
        }
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("leakhound {}", leakhound::VERSION);
            return ExitCode::SUCCESS;
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            return ExitCode::from(1);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"Leakhound - Passive Leak Extraction for Web Pages

USAGE:
    leakhound <COMMAND> [OPTIONS]

COMMANDS:
    scan <url>          Scan a page and every script it loads
    fingerprint <url>   Identify server, framework and security products
    help                Show this help message
    version             Show version information

SCAN OPTIONS:
    --json              Print results as JSON
    --concurrency <N>   Number of parallel fetches (default 10)
    --config <FILE>     Load scan settings from a JSON file
    --proxy <URL>       Send every fetch through a proxy
    --insecure          Accept invalid TLS certificates

EXAMPLES:
    leakhound scan https://example.com
    leakhound scan https://example.com --json --concurrency 4
    leakhound fingerprint https://example.com
"#
    );
}

struct ScanOptions {
    json: bool,
    config: ScanConfig,
}

fn parse_scan_options(args: &[String]) -> anyhow::Result<ScanOptions> {
    let mut json = false;
    let mut config = ScanConfig::default();
    let mut concurrency = None;
    let mut proxy = None;
    let mut insecure = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--concurrency" => {
                let value = iter.next().context("--concurrency needs a value")?;
                let workers: usize = value
                    .parse()
                    .with_context(|| format!("invalid concurrency: {}", value))?;
                concurrency = Some(workers);
            }
            "--config" => {
                let path = iter.next().context("--config needs a file")?;
                config = ScanConfig::from_json_file(path)
                    .with_context(|| format!("loading {}", path))?;
            }
            "--proxy" => {
                let url = iter.next().context("--proxy needs a URL")?;
                proxy = Some(url.clone());
            }
            "--insecure" => insecure = true,
            other => bail!("unknown option: {}", other),
        }
    }

    if let Some(workers) = concurrency {
        config = config.concurrency(workers);
    }
    if let Some(url) = proxy {
        config = config.proxy(url);
    }
    if insecure {
        config = config.accept_invalid_certs(true);
    }
    config.validate()?;
    Ok(ScanOptions { json, config })
}

async fn scan_site(url: &str, args: &[String]) -> anyhow::Result<()> {
    let options = parse_scan_options(args)?;
    let url = Url::parse(url).with_context(|| format!("invalid URL: {}", url))?;

    let client = Arc::new(HttpClient::with_config(HttpClientConfig::from_scan_config(
        &options.config,
    ))?);
    let seed = capture_page(&client, &url)
        .await
        .context("failed to fetch page")?;

    if !options.json {
        println!("Scanning: {} ({} scripts on page)", seed.snapshot.url, seed.snapshot.scripts.len());
    }

    let sink: Arc<dyn ProgressSink> = if options.json {
        Arc::new(NullSink)
    } else {
        Arc::new(LogSink)
    };
    let session = Arc::new(Session::new("cli", options.config));
    let results = session.clone().run(seed, client, sink).await?;

    if options.json {
        println!("{}", results.to_json()?);
        return Ok(());
    }

    let progress = session.progress();
    print_results(&results);
    println!(
        "\nSummary: {} findings, {} resources scanned, status {:?}",
        results.total(),
        progress.completed,
        session.status()
    );
    Ok(())
}

fn print_results(results: &ResultSnapshot) {
    for category in Category::ALL {
        let values = results.values(category);
        if values.is_empty() {
            continue;
        }
        println!("\n=== {} ({}) ===", category, values.len());
        for value in values.iter().take(50) {
            println!("  - {}", value);
        }
        if values.len() > 50 {
            println!("  ... and {} more", values.len() - 50);
        }
    }

    if !results.fingerprints.is_empty() {
        println!("\n=== Fingerprints ({}) ===", results.fingerprints.len());
        for record in &results.fingerprints {
            println!("  [{}] {}: {}", record.category, record.name, record.description);
        }
    }
}

async fn fingerprint_site(url: &str) -> anyhow::Result<()> {
    println!("Fingerprinting: {}", url);

    let url = Url::parse(url).with_context(|| format!("invalid URL: {}", url))?;
    let client = HttpClient::new()?;
    let capture = capture_page(&client, &url)
        .await
        .context("failed to fetch page")?;

    let matcher = FingerprintMatcher::new();
    let mut found = ResultSet::new();
    matcher.match_headers(&capture.headers, &mut found);
    matcher.match_cookies(&capture.cookies, &mut found);
    for script in &capture.snapshot.scripts {
        matcher.match_url(script, &mut found);
    }
    matcher.match_body(&capture.snapshot.html, "page", &mut found);

    println!("\n=== Response ===");
    println!("Status: {}", capture.status);
    println!("URL: {}", capture.snapshot.url);
    println!("Cookies: {}", capture.cookies.len());

    let records = found.fingerprints();
    if records.is_empty() {
        println!("\nNo fingerprints detected");
        return Ok(());
    }

    println!("\n=== Fingerprints ({}) ===", records.len());
    for record in records {
        println!(
            "  [{}] {} {} ({})",
            record.category,
            record.name,
            record.version.as_deref().unwrap_or(""),
            record.source
        );
    }
    Ok(())
}
