// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Leakhound - Passive Leak Extraction
//!
//! Scans a web page and every script it pulls in for leaked information:
//! domains, IPs, API paths, credentials, tokens, personal data and server
//! fingerprints. Pure pattern matching, no JavaScript execution.
//!
//! ## Features
//!
//! - Chunked scanning: bounded-size slices, cooperative yields between chunks
//! - Loop-safe matching: pathological patterns are abandoned, not fatal
//! - Typed filters: every category validates its own candidates
//! - Script discovery: literal references plus bundler chunk reconstruction
//! - Bounded crawl: fixed worker pool, each URL fetched once per session
//! - Fingerprints: server, framework, WAF and analytics detection
//! - Sessions: independent state per browsing context, explicit lifecycle
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use leakhound::{capture_page, HttpClient, HttpClientConfig, LogSink, ScanConfig, Session};
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScanConfig::default();
//!     let client = Arc::new(HttpClient::with_config(
//!         HttpClientConfig::from_scan_config(&config),
//!     )?);
//!
//!     let url = Url::parse("https://example.com")?;
//!     let seed = capture_page(&client, &url).await?;
//!
//!     let session = Arc::new(Session::new("cli", config));
//!     let results = session.run(seed, client, Arc::new(LogSink)).await?;
//!
//!     for value in results.values(leakhound::Category::AbsoluteApi) {
//!         println!("API: {}", value);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawl;
pub mod discovery;
pub mod error;
pub mod fingerprint;
pub mod http;
pub mod patterns;
pub mod results;
pub mod scan;
pub mod session;

// Re-exports for convenience

// Configuration
pub use config::ScanConfig;

// Errors
pub use error::{Error, ErrorContext, Result};

// Results
pub use results::{Category, Finding, ResultSet, ResultSnapshot};

// Scanning
pub use scan::{Chunker, Classifier, FilterContext, MatchCursor, ScanStats, StopReason};
pub use patterns::{ContentKind, PatternKind};

// Discovery
pub use discovery::{PathTree, ResourceDiscoverer, ResourceRef};

// Crawling
pub use crawl::{
    CrawlQueue, EnqueueOutcome, FallbackFetcher, Fetcher, OriginKind, Progress, WorkerPool,
};
#[cfg(any(test, feature = "test-util"))]
pub use crawl::StaticFetcher;

// Fingerprints
pub use fingerprint::{FingerprintCategory, FingerprintMatcher, FingerprintRecord};

// HTTP
pub use http::{capture_page, HttpClient, HttpClientConfig, PageCapture, PageSnapshot, Response};

// Sessions
pub use session::{
    ChannelSink, LogSink, NullSink, ProgressSink, ProgressUpdate, Session, SessionKey,
    SessionRegistry, SessionStatus, SinkEvent, Whitelist,
};

/// Leakhound version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
