// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Scan sessions
//!
//! One [`Session`] per browsing context, owned by a [`SessionRegistry`].
//! Progress and fingerprints are pushed to a [`ProgressSink`].

pub mod progress;
pub mod registry;
#[allow(clippy::module_inception)]
pub mod session;

pub use progress::{
    ChannelSink, LogSink, NullSink, ProgressReporter, ProgressSink, ProgressUpdate, SessionStatus,
    SinkEvent,
};
pub use registry::SessionRegistry;
pub use session::{Session, SessionKey, Whitelist, PAGE_PROVENANCE};
