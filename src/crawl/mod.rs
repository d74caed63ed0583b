// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Resource crawling
//!
//! The crawl queue, the fetch collaborator and the bounded worker pool.

pub mod fetch;
pub mod pool;
pub mod queue;

pub use fetch::{FallbackFetcher, Fetcher};
#[cfg(any(test, feature = "test-util"))]
pub use fetch::StaticFetcher;
pub use pool::{JobOutcome, PoolStats, WorkerContext, WorkerPool, WorkerReport};
pub use queue::{
    normalize_url, percent, CrawlQueue, EnqueueOutcome, OriginKind, Progress, QueuedUrl,
};
