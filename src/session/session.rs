// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Scan session
//!
//! A session owns the results, crawl queue and path tree of one browsing
//! context. Only the coordinator task mutates them; workers hand back
//! per-resource deltas through the pool's report channel.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use tracing::{debug, info, warn};
use url::Url;

use super::progress::{ProgressReporter, ProgressSink, ProgressUpdate, SessionStatus};
use crate::config::ScanConfig;
use crate::crawl::{
    CrawlQueue, EnqueueOutcome, Fetcher, JobOutcome, OriginKind, Progress, WorkerContext,
    WorkerPool,
};
use crate::discovery::{resolve, PathTree, ResourceDiscoverer, ResourceRef};
use crate::error::{Error, Result};
use crate::fingerprint::{FingerprintMatcher, FingerprintRecord};
use crate::http::PageCapture;
use crate::patterns::ContentKind;
use crate::results::{ResultSet, ResultSnapshot};
use crate::scan::{Classifier, FilterContext};

/// Provenance of findings from the seed document
pub const PAGE_PROVENANCE: &str = "page";

/// Identifier of a browsing context
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for SessionKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Hosts that are never scanned
pub trait Whitelist: Send + Sync {
    fn is_whitelisted(&self, hostname: &str) -> bool;
}

impl Whitelist for ScanConfig {
    fn is_whitelisted(&self, hostname: &str) -> bool {
        ScanConfig::is_whitelisted(self, hostname)
    }
}

#[derive(Debug, Default)]
struct SessionState {
    results: ResultSet,
    queue: CrawlQueue,
    paths: PathTree,
}

/// Scanning state of one browsing context
pub struct Session {
    key: SessionKey,
    config: ScanConfig,
    whitelist: Arc<dyn Whitelist>,
    fingerprints: FingerprintMatcher,
    state: Mutex<SessionState>,
    status: Mutex<SessionStatus>,
    cancelled: AtomicBool,
    cancel_signal: Notify,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("key", &self.key)
            .field("status", &self.status())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl Session {
    /// Create a pending session; the config doubles as the whitelist
    pub fn new(key: impl Into<SessionKey>, config: ScanConfig) -> Self {
        let whitelist: Arc<dyn Whitelist> = Arc::new(config.clone());
        Self {
            key: key.into(),
            state: Mutex::new(SessionState {
                queue: CrawlQueue::new(config.skip_third_party),
                ..Default::default()
            }),
            config,
            whitelist,
            fingerprints: FingerprintMatcher::new(),
            status: Mutex::new(SessionStatus::Pending),
            cancelled: AtomicBool::new(false),
            cancel_signal: Notify::new(),
        }
    }

    /// Use a different whitelist
    pub fn with_whitelist(mut self, whitelist: Arc<dyn Whitelist>) -> Self {
        self.whitelist = whitelist;
        self
    }

    /// Use a different fingerprint rule set
    pub fn with_fingerprints(mut self, matcher: FingerprintMatcher) -> Self {
        self.fingerprints = matcher;
        self
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.lock()
    }

    fn set_status(&self, status: SessionStatus) {
        *self.status.lock() = status;
    }

    /// Point-in-time copy of the findings
    pub fn results(&self) -> ResultSnapshot {
        self.state.lock().results.snapshot()
    }

    /// Current crawl progress
    pub fn progress(&self) -> Progress {
        self.state.lock().queue.progress()
    }

    /// Abandon the session; in-flight work is discarded when it completes
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.cancel_signal.notify_one();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Match response headers and cookie names of the main frame
    pub fn observe_signals(
        &self,
        headers: &[(String, String)],
        cookies: &[String],
    ) -> Vec<FingerprintRecord> {
        let mut state = self.state.lock();
        let mut records = self.fingerprints.match_headers(headers, &mut state.results);
        records.extend(self.fingerprints.match_cookies(cookies, &mut state.results));
        records
    }

    /// Run the scan to completion
    ///
    /// Scans the seed page, then crawls every discovered script until the
    /// queue drains. Returns an empty snapshot when the site is whitelisted
    /// or the session was cancelled.
    pub async fn run(
        self: Arc<Self>,
        seed: PageCapture,
        fetcher: Arc<dyn Fetcher>,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<ResultSnapshot> {
        let page = &seed.snapshot;
        let hostname = page.url.host_str().unwrap_or_default().to_string();

        if self.whitelist.is_whitelisted(&hostname) {
            info!(session = %self.key, host = %hostname, "site is whitelisted, not scanning");
            self.state.lock().queue.set_whitelisted(true);
            self.set_status(SessionStatus::Whitelisted);
            self.publish(sink.as_ref(), SessionStatus::Whitelisted).await;
            return Ok(ResultSnapshot::default());
        }

        self.set_status(SessionStatus::Running);
        info!(session = %self.key, url = %page.url, "scan started");
        let started = Instant::now();

        let records = self.observe_signals(&seed.headers, &seed.cookies);
        self.forward(sink.as_ref(), &records).await;

        let context = Arc::new(WorkerContext {
            fetcher,
            classifier: Classifier::new(&self.config)
                .with_fingerprints(self.fingerprints.clone()),
            discoverer: ResourceDiscoverer::new(),
            page_url: page.url.clone(),
            page_host: page.host(),
        });

        // Seed document and its directly observable values
        let mut delta = ResultSet::new();
        let ctx = FilterContext::new(PAGE_PROVENANCE, context.page_host.as_deref());
        context
            .classifier
            .scan_cooperative(&page.html, ContentKind::Page, &ctx, &mut delta)
            .await;
        // Script URLs, meta contents and data attributes are plain text, not markup
        for value in page.seed_values() {
            context
                .classifier
                .scan(value, ContentKind::Resource, &ctx, &mut delta);
        }

        let mut refs = context
            .discoverer
            .discover(&page.html, &page.url, ContentKind::Page);
        refs.extend(
            page.scripts
                .iter()
                .filter_map(|src| resolve(src, &page.url, ContentKind::Page)),
        );

        let records = {
            let mut state = self.state.lock();
            let (_, mut records) = state.results.merge(delta);
            records.extend(self.enqueue_refs(&mut state, refs, OriginKind::Page, &page.url));
            records
        };
        self.forward(sink.as_ref(), &records).await;

        let mut pool = WorkerPool::spawn(self.config.concurrency, context.clone());
        let mut reporter = ProgressReporter::new(self.config.progress_interval);
        let concurrency = self.config.concurrency.max(1);
        let mut in_flight = 0usize;

        loop {
            if self.is_cancelled() {
                pool.abandon();
                return Ok(self.discard());
            }

            while in_flight < concurrency {
                let job = { self.state.lock().queue.next() };
                let Some(job) = job else {
                    break;
                };
                debug!(session = %self.key, url = %job.url, "dispatching");
                pool.submit(job).await?;
                in_flight += 1;
            }
            if in_flight == 0 {
                break;
            }

            let report = tokio::select! {
                report = pool.next_report() => report,
                _ = self.cancel_signal.notified() => continue,
            };
            let Some(report) = report else {
                return Err(Error::other("crawl workers stopped unexpectedly"));
            };
            in_flight -= 1;
            if self.is_cancelled() {
                continue;
            }

            if let JobOutcome::Failed(reason) = &report.outcome {
                debug!(session = %self.key, url = %report.url, reason = %reason, "no content recorded");
            }

            let (added, records, progress) = {
                let mut state = self.state.lock();
                state.queue.complete(&report.url);
                let (added, mut records) = state.results.merge(report.delta);
                records.extend(self.enqueue_refs(
                    &mut state,
                    report.discovered,
                    OriginKind::Resource,
                    &page.url,
                ));
                (added, records, state.queue.progress())
            };
            self.forward(sink.as_ref(), &records).await;

            if reporter.should_push(added > 0, progress.in_flight, Instant::now()) {
                self.publish(sink.as_ref(), SessionStatus::Running).await;
            }
        }

        let stats = pool.stats();
        pool.shutdown().await;

        self.set_status(SessionStatus::Completed);
        reporter.force(Instant::now());
        self.publish(sink.as_ref(), SessionStatus::Completed).await;

        let results = self.results();
        info!(
            session = %self.key,
            findings = results.total(),
            resources = stats.jobs_started,
            failed = stats.jobs_failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scan completed"
        );
        Ok(results)
    }

    /// Anchor, record and schedule discovered references
    fn enqueue_refs(
        &self,
        state: &mut SessionState,
        refs: Vec<ResourceRef>,
        origin: OriginKind,
        page_url: &Url,
    ) -> Vec<FingerprintRecord> {
        let mut records = Vec::new();
        for reference in refs {
            let url = match reference {
                ResourceRef::Absolute(url) => url,
                ResourceRef::Relative(path) => {
                    let anchored = state
                        .paths
                        .resolve(page_url, &path)
                        .or_else(|| page_url.join(&path).ok());
                    let Some(url) = anchored else {
                        debug!(path = %path, "dropping unresolvable reference");
                        continue;
                    };
                    url
                }
            };

            state.paths.insert(&url);
            records.extend(self.fingerprints.match_url(url.as_str(), &mut state.results));
            if state.queue.enqueue(url.clone(), origin) == EnqueueOutcome::Queued {
                debug!(session = %self.key, url = %url, origin = ?origin, "queued");
            }
        }
        records
    }

    fn discard(&self) -> ResultSnapshot {
        self.state.lock().results.clear();
        self.set_status(SessionStatus::Cancelled);
        info!(session = %self.key, "session cancelled, results discarded");
        ResultSnapshot::default()
    }

    async fn forward(&self, sink: &dyn ProgressSink, records: &[FingerprintRecord]) {
        for record in records {
            if let Err(err) = sink.fingerprint(&self.key, record).await {
                warn!(session = %self.key, error = %err, "fingerprint sink failed");
            }
        }
    }

    async fn publish(&self, sink: &dyn ProgressSink, status: SessionStatus) {
        let update = {
            let state = self.state.lock();
            ProgressUpdate {
                session: self.key.clone(),
                status,
                progress: state.queue.progress(),
                results: state.results.snapshot(),
                timestamp: Utc::now(),
            }
        };
        if let Err(err) = sink.publish(update).await {
            warn!(session = %self.key, error = %err, "progress sink failed");
        }
    }
}
