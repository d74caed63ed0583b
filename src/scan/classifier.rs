// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Chunk classifier
//!
//! Runs every applicable pattern over each chunk and hands matches to the
//! family filter. Body fingerprint rules run on the same chunks.

use tracing::debug;

use super::chunker::Chunker;
use super::filters::FilterContext;
use super::matcher::{MatchCursor, StopReason};
use crate::config::ScanConfig;
use crate::fingerprint::FingerprintMatcher;
use crate::patterns::{pattern_table, ContentKind};
use crate::results::ResultSet;

/// Counters for one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub chunks: usize,
    pub matches: usize,
    pub accepted: usize,
    /// Pattern runs cut short by the loop-safety checks
    pub aborted: usize,
    pub fingerprints: usize,
}

impl ScanStats {
    fn absorb(&mut self, other: ScanStats) {
        self.chunks += other.chunks;
        self.matches += other.matches;
        self.accepted += other.accepted;
        self.aborted += other.aborted;
        self.fingerprints += other.fingerprints;
    }
}

/// Pattern classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    chunker: Chunker,
    ceiling: usize,
    fingerprints: FingerprintMatcher,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

impl Classifier {
    /// Create a classifier from a scan configuration
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            chunker: Chunker::new(config.max_chunk_size),
            ceiling: config.match_ceiling,
            fingerprints: FingerprintMatcher::new(),
        }
    }

    /// Replace the fingerprint matcher
    pub fn with_fingerprints(mut self, matcher: FingerprintMatcher) -> Self {
        self.fingerprints = matcher;
        self
    }

    /// The fingerprint matcher used for body rules
    pub fn fingerprints(&self) -> &FingerprintMatcher {
        &self.fingerprints
    }

    /// Scan one chunk
    pub fn scan_chunk(
        &self,
        chunk: &str,
        kind: ContentKind,
        ctx: &FilterContext<'_>,
        out: &mut ResultSet,
    ) -> ScanStats {
        let mut stats = ScanStats {
            chunks: 1,
            ..Default::default()
        };

        for def in pattern_table().iter().filter(|d| d.variant.applies_to(kind)) {
            let filter = def.kind.filter();
            let mut cursor = MatchCursor::with_ceiling(&def.regex, chunk, self.ceiling);
            for caps in cursor.by_ref() {
                if !def.boundary.allows(chunk, &caps) {
                    continue;
                }
                stats.matches += 1;
                if filter(&caps[0], ctx, out) {
                    stats.accepted += 1;
                }
            }
            if matches!(cursor.stop_reason(), StopReason::Stalled | StopReason::Ceiling) {
                debug!(pattern = def.name, provenance = ctx.provenance, "pattern aborted");
                stats.aborted += 1;
            }
        }

        stats.fingerprints = self
            .fingerprints
            .match_body(chunk, ctx.provenance, out)
            .len();
        stats
    }

    /// Scan a whole text, chunk by chunk
    pub fn scan(
        &self,
        text: &str,
        kind: ContentKind,
        ctx: &FilterContext<'_>,
        out: &mut ResultSet,
    ) -> ScanStats {
        let mut stats = ScanStats::default();
        for chunk in self.chunker.chunks(text) {
            stats.absorb(self.scan_chunk(chunk, kind, ctx, out));
        }
        stats
    }

    /// Scan a whole text, yielding to the runtime between chunks
    pub async fn scan_cooperative(
        &self,
        text: &str,
        kind: ContentKind,
        ctx: &FilterContext<'_>,
        out: &mut ResultSet,
    ) -> ScanStats {
        let mut stats = ScanStats::default();
        for chunk in self.chunker.chunks(text) {
            stats.absorb(self.scan_chunk(chunk, kind, ctx, out));
            tokio::task::yield_now().await;
        }
        debug!(
            provenance = ctx.provenance,
            chunks = stats.chunks,
            accepted = stats.accepted,
            "scan complete"
        );
        stats
    }
}
