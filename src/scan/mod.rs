// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Text scanning
//!
//! Chunking, loop-safe matching, per-family filters and the classifier that
//! ties them together.

pub mod chunker;
pub mod classifier;
pub mod filters;
pub mod matcher;

pub use chunker::{Chunker, Chunks};
pub use classifier::{Classifier, ScanStats};
pub use filters::{FilterContext, FilterFn};
pub use matcher::{MatchCursor, StopReason, DEFAULT_MATCH_CEILING};
