// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Resource fetching collaborators

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::error::Result;

/// Single-attempt text fetch
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// Tries the primary fetcher, then the fallback once for recoverable errors
pub struct FallbackFetcher {
    primary: Arc<dyn Fetcher>,
    fallback: Option<Arc<dyn Fetcher>>,
}

impl FallbackFetcher {
    pub fn new(primary: Arc<dyn Fetcher>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Set the alternate fetch origin
    pub fn with_fallback(mut self, fallback: Arc<dyn Fetcher>) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

#[async_trait]
impl Fetcher for FallbackFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        match self.primary.fetch(url).await {
            Ok(body) => Ok(body),
            Err(err) => {
                let Some(fallback) = &self.fallback else {
                    return Err(err);
                };
                if !err.is_recoverable() {
                    debug!(url = %url, error = %err, "fetch failed, not retrying");
                    return Err(err);
                }
                warn!(url = %url, error = %err, "fetch failed, trying fallback");
                fallback.fetch(url).await
            }
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
pub use self::canned::StaticFetcher;

#[cfg(any(test, feature = "test-util"))]
mod canned {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use url::Url;

    use super::Fetcher;
    use crate::error::{Error, Result};

    /// In-memory fetcher serving canned bodies; records every request
    #[derive(Debug, Default)]
    pub struct StaticFetcher {
        bodies: HashMap<String, String>,
        statuses: HashMap<String, u16>,
        requests: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        /// Serve `body` for `url`
        pub fn with(mut self, url: &str, body: impl Into<String>) -> Self {
            self.insert(url, body);
            self
        }

        /// Fail `url` with an HTTP status; unknown URLs fail with 404
        pub fn with_status(mut self, url: &str, status: u16) -> Self {
            self.statuses.insert(url.to_string(), status);
            self
        }

        pub fn insert(&mut self, url: &str, body: impl Into<String>) {
            self.bodies.insert(url.to_string(), body.into());
        }

        /// URLs requested so far, in order
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().clone()
        }
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &Url) -> Result<String> {
            self.requests.lock().push(url.to_string());
            if let Some(status) = self.statuses.get(url.as_str()) {
                return Err(Error::fetch_status(url.as_str(), *status));
            }
            self.bodies
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| Error::fetch_status(url.as_str(), 404))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_static_fetcher() {
        let fetcher = StaticFetcher::new().with("https://x.com/a.js", "var a;");
        assert_eq!(fetcher.fetch(&url("https://x.com/a.js")).await.unwrap(), "var a;");

        let err = fetcher.fetch(&url("https://x.com/b.js")).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_fallback_used_once() {
        let primary = Arc::new(
            StaticFetcher::new()
                .with_status("https://x.com/a.js", 503)
                .with_status("https://x.com/b.js", 502),
        );
        let fallback = Arc::new(StaticFetcher::new().with("https://x.com/a.js", "from fallback"));
        let fetcher = FallbackFetcher::new(primary.clone()).with_fallback(fallback.clone());

        let body = fetcher.fetch(&url("https://x.com/a.js")).await.unwrap();
        assert_eq!(body, "from fallback");

        assert!(fetcher.fetch(&url("https://x.com/b.js")).await.is_err());
        assert_eq!(primary.requests().len(), 2);
        assert_eq!(fallback.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_resource_skips_fallback() {
        let primary = Arc::new(StaticFetcher::new().with_status("https://x.com/gone.js", 410));
        let fallback = Arc::new(StaticFetcher::new().with("https://x.com/a.js", "from fallback"));
        let fetcher = FallbackFetcher::new(primary.clone()).with_fallback(fallback.clone());

        let err = fetcher.fetch(&url("https://x.com/a.js")).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        let err = fetcher.fetch(&url("https://x.com/gone.js")).await.unwrap_err();
        assert_eq!(err.status_code(), Some(410));

        assert_eq!(primary.requests().len(), 2);
        assert!(fallback.requests().is_empty());
    }

    #[tokio::test]
    async fn test_no_fallback() {
        let fetcher = FallbackFetcher::new(Arc::new(StaticFetcher::new()));
        assert!(fetcher.fetch(&url("https://x.com/a.js")).await.is_err());
    }
}
