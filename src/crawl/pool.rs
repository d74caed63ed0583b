// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Fixed-size crawl worker pool
//!
//! Workers share one job receiver and push a [`WorkerReport`] per job into
//! the report channel. Workers never touch session state: each report
//! carries its own result delta for the coordinator to merge.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use super::fetch::Fetcher;
use super::queue::{OriginKind, QueuedUrl};
use crate::discovery::{ResourceDiscoverer, ResourceRef};
use crate::error::{Error, Result};
use crate::patterns::ContentKind;
use crate::results::ResultSet;
use crate::scan::{Classifier, FilterContext, ScanStats};

/// Shared, read-only inputs of every worker
pub struct WorkerContext {
    pub fetcher: Arc<dyn Fetcher>,
    pub classifier: Classifier,
    pub discoverer: ResourceDiscoverer,
    /// URL of the scanned page
    pub page_url: Url,
    /// `host[:port]` of the scanned page
    pub page_host: Option<String>,
}

/// What happened to one job
#[derive(Debug, Clone)]
pub enum JobOutcome {
    Scanned(ScanStats),
    /// Fetch failed; no content is recorded for the URL
    Failed(String),
}

/// Result of one fetch + scan job
#[derive(Debug)]
pub struct WorkerReport {
    pub url: Url,
    pub origin: OriginKind,
    pub outcome: JobOutcome,
    /// Findings of this resource alone
    pub delta: ResultSet,
    pub discovered: Vec<ResourceRef>,
}

/// Pool statistics
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    pub jobs_started: u64,
    pub jobs_failed: u64,
    /// Total time spent fetching (ms)
    pub fetch_ms: u64,
    /// Total bytes scanned
    pub bytes_scanned: u64,
}

/// Crawl worker pool
pub struct WorkerPool {
    jobs: Option<mpsc::Sender<QueuedUrl>>,
    reports: mpsc::Receiver<WorkerReport>,
    handles: Vec<JoinHandle<()>>,
    stats: Arc<RwLock<PoolStats>>,
}

impl WorkerPool {
    /// Spawn `workers` workers (at least one)
    pub fn spawn(workers: usize, context: Arc<WorkerContext>) -> Self {
        let workers = workers.max(1);
        let (job_tx, job_rx) = mpsc::channel::<QueuedUrl>(workers);
        let (report_tx, report_rx) = mpsc::channel::<WorkerReport>(workers);
        let job_rx = Arc::new(Mutex::new(job_rx));
        let stats = Arc::new(RwLock::new(PoolStats::default()));

        let handles = (0..workers)
            .map(|id| {
                let jobs = job_rx.clone();
                let reports = report_tx.clone();
                let context = context.clone();
                let stats = stats.clone();
                tokio::spawn(async move {
                    loop {
                        let job = { jobs.lock().await.recv().await };
                        let Some(job) = job else {
                            break;
                        };
                        let report = process(&context, &stats, job).await;
                        if reports.send(report).await.is_err() {
                            break;
                        }
                    }
                    debug!(worker = id, "crawl worker stopped");
                })
            })
            .collect();

        Self {
            jobs: Some(job_tx),
            reports: report_rx,
            handles,
            stats,
        }
    }

    /// Hand a URL to the workers
    pub async fn submit(&self, job: QueuedUrl) -> Result<()> {
        let jobs = self
            .jobs
            .as_ref()
            .ok_or_else(|| Error::other("worker pool is shut down"))?;
        jobs.send(job)
            .await
            .map_err(|_| Error::other("worker pool closed"))
    }

    /// Wait for the next report
    pub async fn next_report(&mut self) -> Option<WorkerReport> {
        self.reports.recv().await
    }

    /// Pool statistics
    pub fn stats(&self) -> PoolStats {
        self.stats.read().clone()
    }

    /// Stop accepting jobs and wait for the workers to exit
    pub async fn shutdown(mut self) {
        self.jobs.take();
        self.reports.close();
        futures::future::join_all(self.handles.drain(..)).await;
    }

    /// Stop accepting jobs without waiting; in-flight results are dropped
    pub fn abandon(mut self) {
        self.jobs.take();
        self.reports.close();
    }
}

async fn process(
    context: &WorkerContext,
    stats: &RwLock<PoolStats>,
    job: QueuedUrl,
) -> WorkerReport {
    let QueuedUrl { url, origin } = job;
    let start = Instant::now();
    stats.write().jobs_started += 1;

    let body = match context.fetcher.fetch(&url).await {
        Ok(body) => body,
        Err(err) => {
            warn!(url = %url, error = %err, "resource fetch failed");
            stats.write().jobs_failed += 1;
            return WorkerReport {
                url,
                origin,
                outcome: JobOutcome::Failed(err.to_string()),
                delta: ResultSet::new(),
                discovered: Vec::new(),
            };
        }
    };
    {
        let mut stats = stats.write();
        stats.fetch_ms += start.elapsed().as_millis() as u64;
        stats.bytes_scanned += body.len() as u64;
    }

    let mut delta = ResultSet::new();
    let ctx = FilterContext::new(url.as_str(), context.page_host.as_deref());
    let scan = context
        .classifier
        .scan_cooperative(&body, ContentKind::Resource, &ctx, &mut delta)
        .await;
    let discovered = context
        .discoverer
        .discover(&body, &context.page_url, ContentKind::Resource);

    debug!(
        url = %url,
        accepted = scan.accepted,
        discovered = discovered.len(),
        "resource scanned"
    );

    WorkerReport {
        url,
        origin,
        outcome: JobOutcome::Scanned(scan),
        delta,
        discovered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::StaticFetcher;
    use crate::results::Category;

    fn context(fetcher: StaticFetcher) -> Arc<WorkerContext> {
        Arc::new(WorkerContext {
            fetcher: Arc::new(fetcher),
            classifier: Classifier::default(),
            discoverer: ResourceDiscoverer::new(),
            page_url: Url::parse("https://www.example.com/").unwrap(),
            page_host: Some("www.example.com".to_string()),
        })
    }

    fn job(url: &str) -> QueuedUrl {
        QueuedUrl {
            url: Url::parse(url).unwrap(),
            origin: OriginKind::Page,
        }
    }

    #[tokio::test]
    async fn test_worker_scans_and_discovers() {
        let fetcher = StaticFetcher::new().with(
            "https://www.example.com/app.js",
            r#"fetch("/api/order/list"); load("/static/js/more.js");"#,
        );
        let mut pool = WorkerPool::spawn(2, context(fetcher));
        pool.submit(job("https://www.example.com/app.js")).await.unwrap();

        let report = pool.next_report().await.unwrap();
        assert!(matches!(report.outcome, JobOutcome::Scanned(_)));
        assert!(report.delta.contains(Category::AbsoluteApi, "/api/order/list"));
        assert_eq!(
            report.discovered,
            vec![ResourceRef::Absolute(
                Url::parse("https://www.example.com/static/js/more.js").unwrap()
            )]
        );
        assert_eq!(pool.stats().jobs_started, 1);
        pool.shutdown().await;
    }

    #[tokio::test]
    async fn test_failed_fetch_reports_empty() {
        let mut pool = WorkerPool::spawn(1, context(StaticFetcher::new()));
        pool.submit(job("https://www.example.com/missing.js")).await.unwrap();

        let report = pool.next_report().await.unwrap();
        assert!(matches!(report.outcome, JobOutcome::Failed(_)));
        assert!(report.delta.is_empty());
        assert_eq!(pool.stats().jobs_failed, 1);
        pool.shutdown().await;
    }

    #[tokio::test]
    async fn test_many_jobs_all_reported() {
        let mut fetcher = StaticFetcher::new();
        for i in 0..20 {
            fetcher.insert(&format!("https://www.example.com/{}.js", i), "var x = 1;");
        }
        let mut pool = WorkerPool::spawn(4, context(fetcher));

        let mut received = 0;
        let mut submitted = 0;
        while received < 20 {
            while submitted < 20 && submitted - received < 4 {
                pool.submit(job(&format!("https://www.example.com/{}.js", submitted)))
                    .await
                    .unwrap();
                submitted += 1;
            }
            pool.next_report().await.unwrap();
            received += 1;
        }
        assert_eq!(pool.stats().jobs_started, 20);
        pool.shutdown().await;
    }
}
