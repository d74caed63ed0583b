// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Directory trie of observed resource URLs
//!
//! Bundlers emit chunk paths relative to a public path that is not visible in
//! the referencing script. The trie remembers every directory seen per
//! origin so a relative path like `static/js/12.ab.js` can be anchored at the
//! directory that actually contains `static/js/`.

use std::collections::{BTreeMap, HashMap, VecDeque};

use url::Url;

#[derive(Debug, Clone, Default)]
struct Node {
    children: BTreeMap<String, Node>,
}

impl Node {
    fn descend(&self, segments: &[&str]) -> bool {
        let mut node = self;
        for segment in segments {
            match node.children.get(*segment) {
                Some(child) => node = child,
                None => return false,
            }
        }
        true
    }
}

/// Per-origin trie of directory segments
#[derive(Debug, Clone, Default)]
pub struct PathTree {
    roots: HashMap<String, Node>,
    directories: usize,
}

impl PathTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the directories of a resource URL
    pub fn insert(&mut self, url: &Url) {
        let origin = url.origin().ascii_serialization();
        let mut node = self.roots.entry(origin).or_default();
        let Some(segments) = url.path_segments() else {
            return;
        };
        let segments: Vec<&str> = segments.collect();
        // Last segment is the file name
        let dirs = &segments[..segments.len().saturating_sub(1)];
        for dir in dirs.iter().filter(|d| !d.is_empty()) {
            if !node.children.contains_key(*dir) {
                self.directories += 1;
            }
            node = node.children.entry(dir.to_string()).or_default();
        }
    }

    /// Anchor a relative path at the shallowest directory under which its
    /// own directory segments exist
    pub fn resolve(&self, base: &Url, relative: &str) -> Option<Url> {
        let relative = relative.trim_start_matches("./");
        if relative.starts_with("../") || relative.starts_with('/') {
            return None;
        }
        let path = relative.split(['?', '#']).next().unwrap_or(relative);
        let segments: Vec<&str> = path.split('/').collect();
        let rel_dirs = &segments[..segments.len().saturating_sub(1)];
        if rel_dirs.is_empty() || rel_dirs.iter().any(|s| s.is_empty()) {
            return None;
        }

        let origin = base.origin().ascii_serialization();
        let root = self.roots.get(&origin)?;

        let mut queue: VecDeque<(&Node, Vec<&str>)> = VecDeque::new();
        queue.push_back((root, Vec::new()));
        while let Some((node, prefix)) = queue.pop_front() {
            if node.descend(rel_dirs) {
                let mut full = String::from("/");
                for dir in &prefix {
                    full.push_str(dir);
                    full.push('/');
                }
                full.push_str(relative);
                return base.join(&full).ok();
            }
            for (name, child) in &node.children {
                let mut next = prefix.clone();
                next.push(name.as_str());
                queue.push_back((child, next));
            }
        }
        None
    }

    /// Number of distinct directories recorded
    pub fn len(&self) -> usize {
        self.directories
    }

    pub fn is_empty(&self) -> bool {
        self.directories == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> PathTree {
        let mut tree = PathTree::new();
        tree.insert(&Url::parse("https://x.com/app/static/js/main.js").unwrap());
        tree.insert(&Url::parse("https://x.com/app/static/css/site.css").unwrap());
        tree.insert(&Url::parse("https://x.com/vendor/lib.js").unwrap());
        tree
    }

    #[test]
    fn test_counts_directories() {
        assert_eq!(tree().len(), 5);
        assert!(PathTree::new().is_empty());
    }

    #[test]
    fn test_resolves_under_hidden_prefix() {
        let base = Url::parse("https://x.com/app/static/js/main.js").unwrap();
        let resolved = tree().resolve(&base, "static/js/12.ab34.js").unwrap();
        assert_eq!(resolved.as_str(), "https://x.com/app/static/js/12.ab34.js");
    }

    #[test]
    fn test_shallowest_match_wins() {
        let base = Url::parse("https://x.com/").unwrap();
        let resolved = tree().resolve(&base, "js/chunk.js").unwrap();
        assert_eq!(resolved.as_str(), "https://x.com/app/static/js/chunk.js");

        let resolved = tree().resolve(&base, "vendor/other.js").unwrap();
        assert_eq!(resolved.as_str(), "https://x.com/vendor/other.js");
    }

    #[test]
    fn test_unresolvable() {
        let base = Url::parse("https://x.com/").unwrap();
        let tree = tree();
        assert!(tree.resolve(&base, "chunk.js").is_none());
        assert!(tree.resolve(&base, "missing/chunk.js").is_none());
        assert!(tree.resolve(&base, "../static/x.js").is_none());

        let other = Url::parse("https://y.com/").unwrap();
        assert!(tree.resolve(&other, "static/js/a.js").is_none());
    }
}
