// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use url::Url;

/// A fetched response with its body decoded as text
#[derive(Debug, Clone)]
pub struct Response {
    /// Response status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: String,
    /// Final URL (after redirects)
    pub url: Url,
    /// Whether this was a redirect
    pub redirected: bool,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

impl Response {
    /// Create a new response
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: String,
        url: Url,
        redirected: bool,
        response_time_ms: u64,
    ) -> Self {
        Self {
            status,
            headers,
            body,
            url,
            redirected,
            response_time_ms,
        }
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Body text
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get all values for a header
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Headers as lowercase name / value pairs
    pub fn header_pairs(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect()
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Check if content type is HTML
    pub fn is_html(&self) -> bool {
        self.content_type()
            .map(|ct| ct.contains("text/html") || ct.contains("application/xhtml"))
            .unwrap_or(false)
    }

    /// Get Set-Cookie headers
    pub fn set_cookies(&self) -> Vec<&str> {
        self.header_all(super::headers::SET_COOKIE)
    }

    /// Names of the cookies set by this response
    pub fn cookie_names(&self) -> Vec<String> {
        self.set_cookies()
            .into_iter()
            .filter_map(|cookie| {
                let name = cookie.split(';').next()?.split('=').next()?.trim();
                (!name.is_empty()).then(|| name.to_string())
            })
            .collect()
    }

    /// Get the final URL as string
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn response(headers: HeaderMap) -> Response {
        Response::new(
            StatusCode::OK,
            headers,
            "Hello, World!".to_string(),
            Url::parse("https://example.com").unwrap(),
            false,
            100,
        )
    }

    #[test]
    fn test_response_status() {
        let resp = response(HeaderMap::new());
        assert!(resp.is_success());
        assert_eq!(resp.status_code(), 200);
        assert_eq!(resp.text(), "Hello, World!");
    }

    #[test]
    fn test_cookie_names() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("JSESSIONID=abc; Path=/"));
        headers.append("set-cookie", HeaderValue::from_static("lang=en"));
        headers.insert("server", HeaderValue::from_static("Apache-Coyote/1.1"));

        let resp = response(headers);
        assert_eq!(resp.cookie_names(), vec!["JSESSIONID", "lang"]);
        assert!(resp
            .header_pairs()
            .contains(&("server".to_string(), "Apache-Coyote/1.1".to_string())));
    }
}
