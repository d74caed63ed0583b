// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Loop-safe "find all matches" iteration
//!
//! The cursor is an explicit value owned by the iterator, so a new
//! [`MatchCursor`] always starts fresh for a chunk.

use regex::{Captures, Regex};
use tracing::warn;

/// Default number of matches per pattern per chunk
pub const DEFAULT_MATCH_CEILING: usize = 10_000;

/// Why a match iteration ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Still iterating
    Running,
    /// No more matches
    Exhausted,
    /// Two consecutive matches failed to advance the cursor
    Stalled,
    /// The match ceiling was reached
    Ceiling,
}

/// Iterator over the captures of a regex in a haystack
pub struct MatchCursor<'r, 'h> {
    regex: &'r Regex,
    haystack: &'h str,
    cursor: usize,
    last_end: Option<usize>,
    stalls: usize,
    count: usize,
    ceiling: usize,
    stop: StopReason,
}

impl<'r, 'h> MatchCursor<'r, 'h> {
    /// Create a cursor with the default ceiling
    pub fn new(regex: &'r Regex, haystack: &'h str) -> Self {
        Self::with_ceiling(regex, haystack, DEFAULT_MATCH_CEILING)
    }

    /// Create a cursor with a custom ceiling
    pub fn with_ceiling(regex: &'r Regex, haystack: &'h str, ceiling: usize) -> Self {
        Self {
            regex,
            haystack,
            cursor: 0,
            last_end: None,
            stalls: 0,
            count: 0,
            ceiling,
            stop: StopReason::Running,
        }
    }

    /// Reason the iteration stopped
    pub fn stop_reason(&self) -> StopReason {
        self.stop
    }

    /// Matches yielded so far
    pub fn count(&self) -> usize {
        self.count
    }

    fn halt(&mut self, reason: StopReason) -> Option<Captures<'h>> {
        self.stop = reason;
        None
    }
}

impl<'r, 'h> Iterator for MatchCursor<'r, 'h> {
    type Item = Captures<'h>;

    fn next(&mut self) -> Option<Captures<'h>> {
        if self.stop != StopReason::Running {
            return None;
        }
        if self.cursor > self.haystack.len() {
            return self.halt(StopReason::Exhausted);
        }

        let Some(caps) = self.regex.captures_at(self.haystack, self.cursor) else {
            return self.halt(StopReason::Exhausted);
        };
        let Some(whole) = caps.get(0) else {
            return self.halt(StopReason::Exhausted);
        };

        if self.count >= self.ceiling {
            warn!(
                pattern = %self.regex.as_str().chars().take(60).collect::<String>(),
                ceiling = self.ceiling,
                "match ceiling reached, aborting scan of chunk"
            );
            return self.halt(StopReason::Ceiling);
        }

        if whole.start() == whole.end() {
            // Empty match: step past it by one character
            if self.last_end == Some(whole.end()) || whole.end() == self.cursor {
                self.stalls += 1;
            }
            if self.stalls >= 2 {
                warn!(
                    position = whole.end(),
                    "pattern stopped advancing, aborting scan of chunk"
                );
                return self.halt(StopReason::Stalled);
            }
            self.cursor = whole.end()
                + self.haystack[whole.end()..]
                    .chars()
                    .next()
                    .map(char::len_utf8)
                    .unwrap_or(1);
        } else {
            self.stalls = 0;
            self.cursor = whole.end();
        }

        self.last_end = Some(whole.end());
        self.count += 1;
        Some(caps)
    }
}
