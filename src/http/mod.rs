// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer
//!
//! A stateless reqwest client used as the resource fetcher, plus page
//! snapshots for seeding a scan from a live URL.

mod client;
mod response;
mod snapshot;

pub use client::{HttpClient, HttpClientConfig};
pub use response::Response;
pub use snapshot::{capture_page, PageCapture, PageSnapshot, SENSITIVE_DATA_ATTRIBUTES};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const ACCEPT_LANGUAGE: &str = "accept-language";
    pub const SET_COOKIE: &str = "set-cookie";
}
