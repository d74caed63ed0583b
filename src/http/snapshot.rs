// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Page snapshots built with html5ever

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use url::Url;

use super::client::HttpClient;
use crate::error::{Error, ErrorContext, Result};

/// `data-*` attributes that commonly carry endpoints or config
pub const SENSITIVE_DATA_ATTRIBUTES: &[&str] = &["api", "url", "endpoint", "server", "config"];

/// The seed content of a page and its directly observable references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub url: Url,
    pub html: String,
    /// Absolute `script[src]` URLs
    pub scripts: Vec<String>,
    /// Absolute `link[href]` and `a[href^=http]` URLs
    pub links: Vec<String>,
    pub meta_contents: Vec<String>,
    pub data_attributes: Vec<String>,
}

impl PageSnapshot {
    /// Parse a page
    pub fn parse(url: Url, html: impl Into<String>) -> Result<Self> {
        let html = html.into();
        let dom = parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut snapshot = Self {
            url,
            html: String::new(),
            scripts: Vec::new(),
            links: Vec::new(),
            meta_contents: Vec::new(),
            data_attributes: Vec::new(),
        };
        snapshot.walk(&dom.document);
        snapshot.html = html;
        Ok(snapshot)
    }

    fn walk(&mut self, handle: &Handle) {
        if let NodeData::Element { name, attrs, .. } = &handle.data {
            let tag = &*name.local;
            for attr in attrs.borrow().iter() {
                let attr_name = &*attr.name.local;
                let value = attr.value.trim();
                if value.is_empty() {
                    continue;
                }
                match (tag, attr_name) {
                    ("script", "src") => self.push_url(value, true),
                    ("link", "href") => self.push_url(value, false),
                    ("a", "href") if value.starts_with("http") => self.push_url(value, false),
                    ("meta", "content") => self.meta_contents.push(value.to_string()),
                    (_, data) => {
                        if let Some(key) = data.strip_prefix("data-") {
                            if SENSITIVE_DATA_ATTRIBUTES.contains(&key) {
                                self.data_attributes.push(value.to_string());
                            }
                        }
                    }
                }
            }
        }
        for child in handle.children.borrow().iter() {
            self.walk(child);
        }
    }

    fn push_url(&mut self, value: &str, script: bool) {
        let Ok(resolved) = self.url.join(value) else {
            return;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            return;
        }
        let target = if script { &mut self.scripts } else { &mut self.links };
        let resolved = resolved.to_string();
        if !target.contains(&resolved) {
            target.push(resolved);
        }
    }

    /// Host of the page as `host[:port]`
    pub fn host(&self) -> Option<String> {
        let host = self.url.host_str()?;
        Some(match self.url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }

    /// Non-HTML values scanned alongside the page
    pub fn seed_values(&self) -> impl Iterator<Item = &str> {
        self.scripts
            .iter()
            .chain(&self.links)
            .chain(&self.meta_contents)
            .chain(&self.data_attributes)
            .map(String::as_str)
    }
}

/// A fetched page with the signals the fingerprint matcher needs
#[derive(Debug, Clone)]
pub struct PageCapture {
    pub snapshot: PageSnapshot,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<String>,
}

/// Fetch and snapshot a page
pub async fn capture_page(client: &HttpClient, url: &Url) -> Result<PageCapture> {
    let response = client.get(url).await.with_url(url.as_str())?;
    if !response.is_success() {
        return Err(Error::fetch_status(url.as_str(), response.status_code()));
    }
    let headers = response.header_pairs();
    let cookies = response.cookie_names();
    let status = response.status_code();
    let snapshot = PageSnapshot::parse(response.url.clone(), response.body)?;
    Ok(PageCapture {
        snapshot,
        status,
        headers,
        cookies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta name="description" content="Internal portal at portal.example.com">
  <meta charset="utf-8">
  <link rel="stylesheet" href="/css/site.css">
  <script src="/static/js/app.js"></script>
  <script src="https://cdn.example.net/lib/vue.min.js"></script>
  <script>var inline = 1;</script>
</head>
<body>
  <a href="https://docs.example.org/guide">Docs</a>
  <a href="/local">Local</a>
  <div data-api="/api/v2/config" data-role="main"></div>
  <span data-endpoint="wss://push.example.com/ws"></span>
</body>
</html>"#;

    fn snapshot() -> PageSnapshot {
        PageSnapshot::parse(Url::parse("https://www.example.com/home").unwrap(), HTML).unwrap()
    }

    #[test]
    fn test_collects_scripts_and_links() {
        let snap = snapshot();
        assert_eq!(
            snap.scripts,
            vec![
                "https://www.example.com/static/js/app.js",
                "https://cdn.example.net/lib/vue.min.js",
            ]
        );
        assert_eq!(
            snap.links,
            vec![
                "https://www.example.com/css/site.css",
                "https://docs.example.org/guide",
            ]
        );
    }

    #[test]
    fn test_collects_meta_and_data_attributes() {
        let snap = snapshot();
        assert_eq!(snap.meta_contents, vec!["Internal portal at portal.example.com"]);
        assert_eq!(
            snap.data_attributes,
            vec!["/api/v2/config", "wss://push.example.com/ws"]
        );
        assert_eq!(snap.seed_values().count(), 7);
    }

    #[test]
    fn test_keeps_html_and_host() {
        let snap = snapshot();
        assert_eq!(snap.html, HTML);
        assert_eq!(snap.host().as_deref(), Some("www.example.com"));
    }
}
