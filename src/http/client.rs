// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::response::Response;
use super::{headers, DEFAULT_USER_AGENT};
use crate::config::ScanConfig;
use crate::crawl::Fetcher;
use crate::error::{Error, ErrorContext, Result};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Default timeout
    pub timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
    /// Default headers
    pub default_headers: HeaderMap,
    /// Proxy URL
    pub proxy: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(headers::ACCEPT, HeaderValue::from_static("*/*"));
        default_headers.insert(
            headers::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5"),
        );

        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            max_redirects: 10,
            accept_invalid_certs: false,
            default_headers,
            proxy: None,
        }
    }
}

impl HttpClientConfig {
    /// Client settings for a scan session
    pub fn from_scan_config(config: &ScanConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.fetch_timeout,
            max_redirects: config.max_redirects,
            accept_invalid_certs: config.accept_invalid_certs,
            proxy: config.proxy.clone(),
            ..Default::default()
        }
    }
}

/// Stateless HTTP client; no cookies or credentials are ever sent
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .default_headers(config.default_headers.clone());

        if let Some(ref proxy_url) = config.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?,
            );
        }

        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Execute a GET request; any status is returned as a response
    pub async fn get(&self, url: &Url) -> Result<Response> {
        let start = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let response_time = start.elapsed().as_millis() as u64;

        let redirected = response.url() != url;
        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        debug!(url = %url, status = status.as_u16(), response_time, "fetched");

        Ok(Response::new(
            status,
            headers,
            body,
            final_url,
            redirected,
            response_time,
        ))
    }

    /// Fetch a resource body; non-2xx responses are errors
    pub async fn fetch_text(&self, url: &Url) -> Result<String> {
        let response = self.get(url).await.with_url(url.as_str())?;
        if !response.is_success() {
            return Err(Error::fetch_status(url.as_str(), response.status_code()));
        }
        Ok(response.body)
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn fetch(&self, url: &Url) -> Result<String> {
        self.fetch_text(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.config().user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_config_from_scan_config() {
        let scan = ScanConfig::default().fetch_timeout(Duration::from_secs(5));
        let config = HttpClientConfig::from_scan_config(&scan);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, scan.user_agent);
        assert_eq!(config.max_redirects, 10);
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_transport_settings_reach_client() {
        let scan = ScanConfig::default()
            .proxy("http://127.0.0.1:8080")
            .accept_invalid_certs(true)
            .max_redirects(3);
        let client = HttpClient::with_config(HttpClientConfig::from_scan_config(&scan)).unwrap();
        assert_eq!(client.config().proxy.as_deref(), Some("http://127.0.0.1:8080"));
        assert!(client.config().accept_invalid_certs);
        assert_eq!(client.config().max_redirects, 3);
    }

    #[test]
    fn test_invalid_proxy_rejected() {
        let scan = ScanConfig::default().proxy("::not a proxy::");
        let err = HttpClient::with_config(HttpClientConfig::from_scan_config(&scan)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_cookies_never_sent_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header_exists("cookie"))
            .respond_with(ResponseTemplate::new(418))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "JSESSIONID=abc123; path=/")
                    .set_body_string("ok"),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = Url::parse(&format!("{}/login", server.uri())).unwrap();
        client.fetch_text(&url).await.unwrap();
        let url = Url::parse(&format!("{}/static/app.js", server.uri())).unwrap();
        assert_eq!(client.fetch_text(&url).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_fetch_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/static/app.js"))
            .and(header("accept", "*/*"))
            .respond_with(ResponseTemplate::new(200).set_body_string("var api = '/api/v1/user';"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = Url::parse(&format!("{}/static/app.js", server.uri())).unwrap();
        let body = client.fetch(&url).await.unwrap();
        assert!(body.contains("/api/v1/user"));
    }

    #[tokio::test]
    async fn test_non_success_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = Url::parse(&format!("{}/missing.js", server.uri())).unwrap();
        let err = client.fetch(&url).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
        assert!(!err.is_recoverable());
        assert_eq!(err.url(), Some(url.as_str()));
    }

    #[tokio::test]
    async fn test_get_exposes_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("server", "nginx/1.18.0")
                    .insert_header("set-cookie", "PHPSESSID=1; path=/")
                    .set_body_string("<html></html>"),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let response = client.get(&url).await.unwrap();
        assert_eq!(response.header("server"), Some("nginx/1.18.0"));
        assert_eq!(response.cookie_names(), vec!["PHPSESSID"]);
    }
}
