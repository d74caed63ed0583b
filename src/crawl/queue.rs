// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Crawl queue
//!
//! Every URL ever accepted is remembered, so a URL is scheduled at most once
//! per session. At all times `queued + in_flight + completed == known`.

use std::collections::{HashSet, VecDeque};

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::patterns::is_third_party_script;

/// Where a URL was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginKind {
    /// The page itself (script tags, page literals)
    Page,
    /// Another fetched resource
    Resource,
}

/// Result of an enqueue attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Queued,
    /// Already known to this session
    Duplicate,
    /// Well-known third-party library, not fetched
    ThirdParty,
    /// The session's site is whitelisted
    Whitelisted,
}

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    pub url: Url,
    pub origin: OriginKind,
}

/// Point-in-time crawl progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub total: usize,
    pub queued: usize,
    pub in_flight: usize,
    pub completed: usize,
    pub percent: u8,
}

impl Progress {
    /// Nothing queued and nothing in flight
    pub fn is_done(&self) -> bool {
        self.queued == 0 && self.in_flight == 0
    }
}

/// FIFO crawl queue with a session-wide dedup set
#[derive(Debug, Clone)]
pub struct CrawlQueue {
    pending: VecDeque<QueuedUrl>,
    known: HashSet<String>,
    in_flight: HashSet<String>,
    completed: HashSet<String>,
    skipped: HashSet<String>,
    skip_third_party: bool,
    whitelisted: bool,
}

impl Default for CrawlQueue {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CrawlQueue {
    /// Create a queue
    pub fn new(skip_third_party: bool) -> Self {
        Self {
            pending: VecDeque::new(),
            known: HashSet::new(),
            in_flight: HashSet::new(),
            completed: HashSet::new(),
            skipped: HashSet::new(),
            skip_third_party,
            whitelisted: false,
        }
    }

    /// Refuse every further enqueue
    pub fn set_whitelisted(&mut self, whitelisted: bool) {
        self.whitelisted = whitelisted;
    }

    /// Schedule a URL unless it is known, skipped or whitelisted
    pub fn enqueue(&mut self, url: Url, origin: OriginKind) -> EnqueueOutcome {
        if self.whitelisted {
            return EnqueueOutcome::Whitelisted;
        }
        let url = normalize_url(url);
        let key = url.as_str().to_string();

        if self.known.contains(&key) {
            return EnqueueOutcome::Duplicate;
        }
        if self.skip_third_party && is_third_party_script(&key) {
            if self.skipped.insert(key) {
                debug!(url = %url, "skipping third-party library");
            }
            return EnqueueOutcome::ThirdParty;
        }

        self.known.insert(key);
        self.pending.push_back(QueuedUrl { url, origin });
        EnqueueOutcome::Queued
    }

    /// Take the next URL and mark it in flight
    pub fn next(&mut self) -> Option<QueuedUrl> {
        let item = self.pending.pop_front()?;
        self.in_flight.insert(item.url.as_str().to_string());
        Some(item)
    }

    /// Mark an in-flight URL as completed (fetched or failed)
    pub fn complete(&mut self, url: &Url) -> bool {
        let key = url.as_str();
        if !self.in_flight.remove(key) {
            return false;
        }
        self.completed.insert(key.to_string());
        true
    }

    /// Check whether a URL is known to this session
    pub fn contains(&self, url: &Url) -> bool {
        let url = normalize_url(url.clone());
        self.known.contains(url.as_str())
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn completed_len(&self) -> usize {
        self.completed.len()
    }

    pub fn known_len(&self) -> usize {
        self.known.len()
    }

    /// Third-party URLs that were refused
    pub fn skipped(&self) -> impl Iterator<Item = &str> {
        self.skipped.iter().map(String::as_str)
    }

    /// Nothing queued and nothing in flight
    pub fn is_drained(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_empty()
    }

    /// Current progress
    pub fn progress(&self) -> Progress {
        let total = self.known.len();
        let queued = self.pending.len();
        let in_flight = self.in_flight.len();
        Progress {
            total,
            queued,
            in_flight,
            completed: self.completed.len(),
            percent: percent(total, queued, in_flight),
        }
    }
}

/// `floor((total - queued - in_flight) / total * 100)`, 100 when empty
pub fn percent(total: usize, queued: usize, in_flight: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let done = total.saturating_sub(queued + in_flight);
    (done * 100 / total).min(100) as u8
}

/// Normalize a URL for deduplication (drops the fragment)
pub fn normalize_url(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}
