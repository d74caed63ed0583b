// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Progress reporting
//!
//! Sinks are fire-and-forget: a failing sink is logged and otherwise
//! ignored by the session.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;

use super::SessionKey;
use crate::crawl::Progress;
use crate::error::{Error, Result};
use crate::fingerprint::FingerprintRecord;
use crate::results::ResultSnapshot;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Running,
    /// The site is whitelisted; nothing was scanned
    Whitelisted,
    Completed,
    /// Torn down before completion; results discarded
    Cancelled,
}

/// A progress and results push
#[derive(Debug, Clone, Serialize)]
pub struct ProgressUpdate {
    pub session: SessionKey,
    pub status: SessionStatus,
    pub progress: Progress,
    pub results: ResultSnapshot,
    pub timestamp: DateTime<Utc>,
}

impl ProgressUpdate {
    pub fn percent(&self) -> u8 {
        self.progress.percent
    }

    /// Terminal update
    pub fn is_final(&self) -> bool {
        self.status != SessionStatus::Running && self.status != SessionStatus::Pending
    }
}

/// Receiver of progress pushes and fingerprint records
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn publish(&self, update: ProgressUpdate) -> Result<()>;

    async fn fingerprint(&self, _session: &SessionKey, _record: &FingerprintRecord) -> Result<()> {
        Ok(())
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl ProgressSink for NullSink {
    async fn publish(&self, _update: ProgressUpdate) -> Result<()> {
        Ok(())
    }
}

/// Logs pushes through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl ProgressSink for LogSink {
    async fn publish(&self, update: ProgressUpdate) -> Result<()> {
        info!(
            session = %update.session,
            percent = update.percent(),
            findings = update.results.total(),
            status = ?update.status,
            "scan progress"
        );
        Ok(())
    }

    async fn fingerprint(&self, session: &SessionKey, record: &FingerprintRecord) -> Result<()> {
        info!(
            session = %session,
            category = %record.category,
            name = %record.name,
            version = record.version.as_deref().unwrap_or("-"),
            "fingerprint"
        );
        Ok(())
    }
}

/// Event delivered by a [`ChannelSink`]
#[derive(Debug, Clone)]
pub enum SinkEvent {
    Progress(ProgressUpdate),
    Fingerprint(SessionKey, FingerprintRecord),
}

/// Forwards pushes into an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SinkEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SinkEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl ProgressSink for ChannelSink {
    async fn publish(&self, update: ProgressUpdate) -> Result<()> {
        self.tx
            .send(SinkEvent::Progress(update))
            .map_err(|_| Error::sink("progress receiver dropped"))
    }

    async fn fingerprint(&self, session: &SessionKey, record: &FingerprintRecord) -> Result<()> {
        self.tx
            .send(SinkEvent::Fingerprint(session.clone(), record.clone()))
            .map_err(|_| Error::sink("progress receiver dropped"))
    }
}

/// Throttles progress pushes to a minimum interval
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    interval: Duration,
    last_push: Option<Instant>,
}

impl ProgressReporter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_push: None,
        }
    }

    /// Decide whether to push after a step; records the push when it does
    pub fn should_push(&mut self, new_findings: bool, in_flight: usize, now: Instant) -> bool {
        if !new_findings && in_flight > 0 {
            return false;
        }
        if let Some(last) = self.last_push {
            if now.duration_since(last) < self.interval {
                return false;
            }
        }
        self.last_push = Some(now);
        true
    }

    /// Record an unconditional push
    pub fn force(&mut self, now: Instant) {
        self.last_push = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_needs_a_trigger() {
        let mut reporter = ProgressReporter::new(Duration::from_millis(100));
        let now = Instant::now();
        assert!(!reporter.should_push(false, 3, now));
        assert!(reporter.should_push(true, 3, now));
    }

    #[test]
    fn test_reporter_throttles() {
        let mut reporter = ProgressReporter::new(Duration::from_millis(100));
        let start = Instant::now();
        assert!(reporter.should_push(true, 1, start));
        assert!(!reporter.should_push(true, 1, start + Duration::from_millis(50)));
        assert!(!reporter.should_push(false, 0, start + Duration::from_millis(99)));
        assert!(reporter.should_push(false, 0, start + Duration::from_millis(150)));
    }

    #[test]
    fn test_force_resets_window() {
        let mut reporter = ProgressReporter::new(Duration::from_millis(100));
        let start = Instant::now();
        reporter.force(start);
        assert!(!reporter.should_push(true, 0, start + Duration::from_millis(10)));
    }

    #[tokio::test]
    async fn test_channel_sink() {
        let (sink, mut rx) = ChannelSink::new();
        let update = ProgressUpdate {
            session: SessionKey::from("tab-1"),
            status: SessionStatus::Completed,
            progress: crate::crawl::CrawlQueue::default().progress(),
            results: ResultSnapshot::default(),
            timestamp: Utc::now(),
        };
        sink.publish(update).await.unwrap();
        match rx.recv().await.unwrap() {
            SinkEvent::Progress(update) => {
                assert_eq!(update.percent(), 100);
                assert!(update.is_final());
            }
            other => panic!("unexpected event {:?}", other),
        }

        drop(rx);
        let err = sink
            .publish(ProgressUpdate {
                session: SessionKey::from("tab-1"),
                status: SessionStatus::Running,
                progress: crate::crawl::CrawlQueue::default().progress(),
                results: ResultSnapshot::default(),
                timestamp: Utc::now(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Sink(_)));
    }
}
