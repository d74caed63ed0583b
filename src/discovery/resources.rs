// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Script reference discovery

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;
use url::Url;

use super::webpack;
use crate::patterns::ContentKind;

lazy_static! {
    static ref SCRIPT_LITERAL: Regex =
        Regex::new(r#"["']([^"'\s<>]+\.js(?:\?[^"'\s]*)?)["']"#).unwrap();
    static ref SCHEME: Regex = Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap();
}

/// A discovered script reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    /// Fully resolved URL
    Absolute(Url),
    /// Path relative to an unknown public path, found inside a resource
    Relative(String),
}

impl ResourceRef {
    /// The absolute URL, if resolved
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            ResourceRef::Absolute(url) => Some(url),
            ResourceRef::Relative(_) => None,
        }
    }
}

/// Extracts script references from page and resource content
#[derive(Debug, Clone)]
pub struct ResourceDiscoverer {
    reconstruct_chunks: bool,
}

impl Default for ResourceDiscoverer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceDiscoverer {
    pub fn new() -> Self {
        Self {
            reconstruct_chunks: true,
        }
    }

    /// Disable bundler chunk reconstruction
    pub fn without_chunk_reconstruction(mut self) -> Self {
        self.reconstruct_chunks = false;
        self
    }

    /// Discover script references in `content`
    ///
    /// `base` is the page URL. Relative paths found in page content resolve
    /// against it; relative paths found in resources are returned as
    /// [`ResourceRef::Relative`] for the caller to anchor.
    pub fn discover(&self, content: &str, base: &Url, kind: ContentKind) -> Vec<ResourceRef> {
        let mut seen = HashSet::new();
        let mut refs = Vec::new();

        let literals = SCRIPT_LITERAL
            .captures_iter(content)
            .map(|caps| caps[1].to_string());
        let chunks = if self.reconstruct_chunks {
            webpack::reconstruct(content)
        } else {
            Vec::new()
        };
        if !chunks.is_empty() {
            debug!(count = chunks.len(), "reconstructed bundler chunks");
        }

        for path in literals.chain(chunks) {
            if let Some(resource) = resolve(&path, base, kind) {
                if seen.insert(resource.clone()) {
                    refs.push(resource);
                }
            }
        }
        refs
    }
}

/// Resolve one script path against the page URL
pub fn resolve(path: &str, base: &Url, kind: ContentKind) -> Option<ResourceRef> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }

    if path.starts_with("http://") || path.starts_with("https://") {
        return Url::parse(path).ok().map(ResourceRef::Absolute);
    }
    if path.starts_with("//") {
        return Url::parse(&format!("{}:{}", base.scheme(), path))
            .ok()
            .map(ResourceRef::Absolute);
    }
    // data:, javascript:, webpack:// and friends
    if SCHEME.is_match(path) {
        return None;
    }
    if path.starts_with('/') {
        return base.join(path).ok().map(ResourceRef::Absolute);
    }

    match kind {
        ContentKind::Page => base.join(path).ok().map(ResourceRef::Absolute),
        ContentKind::Resource => Some(ResourceRef::Relative(path.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.example.com/app/index.html").unwrap()
    }

    fn urls(refs: &[ResourceRef]) -> Vec<&str> {
        refs.iter().filter_map(|r| r.as_url()).map(Url::as_str).collect()
    }

    #[test]
    fn test_page_literal_forms() {
        let html = r#"
            <script src="https://cdn.example.net/lib/app.js"></script>
            <script src="//static.example.com/a.js?v=1"></script>
            <script src="/js/main.js"></script>
            <script src="js/page.js"></script>
            <script src="data:text/javascript,alert(1).js"></script>
        "#;
        let refs = ResourceDiscoverer::new().discover(html, &base(), ContentKind::Page);
        assert_eq!(
            urls(&refs),
            vec![
                "https://cdn.example.net/lib/app.js",
                "https://static.example.com/a.js?v=1",
                "https://www.example.com/js/main.js",
                "https://www.example.com/app/js/page.js",
            ]
        );
    }

    #[test]
    fn test_resource_relative_kept_relative() {
        let js = r#"load("static/js/extra.js"); load("/root.js")"#;
        let refs = ResourceDiscoverer::new().discover(js, &base(), ContentKind::Resource);
        assert_eq!(
            refs,
            vec![
                ResourceRef::Relative("static/js/extra.js".to_string()),
                ResourceRef::Absolute(Url::parse("https://www.example.com/root.js").unwrap()),
            ]
        );
    }

    #[test]
    fn test_deduplicates() {
        let js = r#"a("/x.js");b("/x.js");c('/x.js')"#;
        let refs = ResourceDiscoverer::new().discover(js, &base(), ContentKind::Resource);
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn test_includes_reconstructed_chunks() {
        let js = r#"return "static/js/"+e+"."+{"7":"0a1b2c3d"}[e]+".js""#;
        let refs = ResourceDiscoverer::new().discover(js, &base(), ContentKind::Resource);
        assert!(refs.contains(&ResourceRef::Relative("static/js/7.0a1b2c3d.js".to_string())));

        let refs = ResourceDiscoverer::new()
            .without_chunk_reconstruction()
            .discover(js, &base(), ContentKind::Resource);
        assert!(refs.is_empty());
    }
}
