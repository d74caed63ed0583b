// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Scan configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::http::DEFAULT_USER_AGENT;

/// Hosts that are never scanned
pub const DEFAULT_WHITELIST: &[&str] = &[
    "github.com",
    "360.net",
    "bing.com",
    "csdn.net",
    "bilibili.com",
    "google.com",
    "youtube.com",
    "microsoft.com",
    "apple.com",
    "mozilla.org",
    "aliyun.com",
    "feishu.cn",
    "mklab.cn",
    "cnnvd.org.cn",
    "qq.com",
    "baidu.com",
];

/// Scan session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Maximum chunk size in bytes
    pub max_chunk_size: usize,
    /// Number of crawl workers
    pub concurrency: usize,
    /// Matches per pattern per chunk before the matcher gives up
    pub match_ceiling: usize,
    /// Minimum interval between progress pushes
    #[serde(with = "duration_ms")]
    pub progress_interval: Duration,
    /// Skip well-known third-party libraries
    pub skip_third_party: bool,
    /// Hosts (and their subdomains) that are never scanned
    pub whitelist: Vec<String>,
    /// User agent for resource fetches
    pub user_agent: String,
    /// Timeout for a single resource fetch
    #[serde(with = "duration_ms")]
    pub fetch_timeout: Duration,
    /// Redirects followed per fetch
    pub max_redirects: usize,
    /// Accept invalid TLS certificates
    pub accept_invalid_certs: bool,
    /// Proxy for every fetch, e.g. `http://127.0.0.1:8080`
    pub proxy: Option<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: 100_000,
            concurrency: 10,
            match_ceiling: 10_000,
            progress_interval: Duration::from_millis(100),
            skip_third_party: true,
            whitelist: DEFAULT_WHITELIST.iter().map(|s| s.to_string()).collect(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout: Duration::from_secs(30),
            max_redirects: 10,
            accept_invalid_certs: false,
            proxy: None,
        }
    }
}

impl ScanConfig {
    /// Create a new scan config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max chunk size
    pub fn max_chunk_size(mut self, size: usize) -> Self {
        self.max_chunk_size = size;
        self
    }

    /// Set worker count
    pub fn concurrency(mut self, workers: usize) -> Self {
        self.concurrency = workers;
        self
    }

    /// Set per-chunk match ceiling
    pub fn match_ceiling(mut self, ceiling: usize) -> Self {
        self.match_ceiling = ceiling;
        self
    }

    /// Set progress throttle interval
    pub fn progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Enable/disable third-party library skipping
    pub fn skip_third_party(mut self, skip: bool) -> Self {
        self.skip_third_party = skip;
        self
    }

    /// Add a whitelisted host
    pub fn whitelist(mut self, host: impl Into<String>) -> Self {
        self.whitelist.push(host.into());
        self
    }

    /// Replace the whitelist
    pub fn clear_whitelist(mut self) -> Self {
        self.whitelist.clear();
        self
    }

    /// Set fetch timeout
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set redirect limit
    pub fn max_redirects(mut self, redirects: usize) -> Self {
        self.max_redirects = redirects;
        self
    }

    /// Accept invalid TLS certificates (dangerous!)
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Route fetches through a proxy
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy = Some(url.into());
        self
    }

    /// Create config tuned for very large single-page apps
    pub fn for_large_sites() -> Self {
        Self {
            max_chunk_size: 50_000,
            concurrency: 16,
            progress_interval: Duration::from_millis(250),
            fetch_timeout: Duration::from_secs(15),
            ..Default::default()
        }
    }

    /// Load a config from a JSON file, missing fields take defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: ScanConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the scanner cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::config("concurrency must be at least 1"));
        }
        if self.max_chunk_size == 0 {
            return Err(Error::config("max_chunk_size must be at least 1"));
        }
        if self.match_ceiling == 0 {
            return Err(Error::config("match_ceiling must be at least 1"));
        }
        Ok(())
    }

    /// Check whether a host is whitelisted (exact or subdomain match)
    pub fn is_whitelisted(&self, hostname: &str) -> bool {
        let host = hostname.to_ascii_lowercase();
        self.whitelist.iter().any(|domain| {
            host == *domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.match_ceiling, 10_000);
        assert_eq!(config.max_chunk_size, 100_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ScanConfig::new()
            .concurrency(3)
            .max_chunk_size(64)
            .skip_third_party(false);

        assert_eq!(config.concurrency, 3);
        assert_eq!(config.max_chunk_size, 64);
        assert!(!config.skip_third_party);
    }

    #[test]
    fn test_whitelist_matching() {
        let config = ScanConfig::default();
        assert!(config.is_whitelisted("github.com"));
        assert!(config.is_whitelisted("Gist.GitHub.com"));
        assert!(!config.is_whitelisted("notgithub.com"));
        assert!(!config.is_whitelisted("target.example.top"));
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(ScanConfig::new().concurrency(0).validate().is_err());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"concurrency": 4, "progress_interval": 500}}"#).unwrap();

        let config = ScanConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.progress_interval, Duration::from_millis(500));
        assert_eq!(config.match_ceiling, 10_000);
    }

    #[test]
    fn test_transport_settings_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"proxy": "http://127.0.0.1:8080", "accept_invalid_certs": true, "max_redirects": 2}}"#
        )
        .unwrap();

        let config = ScanConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.proxy.as_deref(), Some("http://127.0.0.1:8080"));
        assert!(config.accept_invalid_certs);
        assert_eq!(config.max_redirects, 2);
        assert!(ScanConfig::default().proxy.is_none());
    }
}
