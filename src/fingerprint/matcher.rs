// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Rule matcher for headers, cookies, URLs and bodies

use regex::Captures;
use tracing::debug;

use super::rules::{default_rules, FingerprintRule, RuleSource};
use super::{FingerprintCategory, FingerprintRecord};
use crate::results::ResultSet;

/// Matches fingerprint rules against observable signals
#[derive(Debug, Clone)]
pub struct FingerprintMatcher {
    rules: Vec<FingerprintRule>,
}

impl Default for FingerprintMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FingerprintMatcher {
    /// Create a matcher with the built-in rules
    pub fn new() -> Self {
        Self::with_rules(default_rules().to_vec())
    }

    /// Create a matcher with a custom rule table
    pub fn with_rules(rules: Vec<FingerprintRule>) -> Self {
        Self { rules }
    }

    /// Rules in table order
    pub fn rules(&self) -> &[FingerprintRule] {
        &self.rules
    }

    /// Match response headers; returns the newly recorded fingerprints
    pub fn match_headers(
        &self,
        headers: &[(String, String)],
        out: &mut ResultSet,
    ) -> Vec<FingerprintRecord> {
        let mut found = Vec::new();
        for rule in &self.rules {
            let RuleSource::Header(wanted) = rule.source else {
                continue;
            };
            if out.has_fingerprint(rule.name) {
                continue;
            }
            for (name, value) in headers {
                if !name.eq_ignore_ascii_case(wanted) {
                    continue;
                }
                if let Some(caps) = rule.pattern.captures(value.trim()) {
                    let source = format!("header:{}", wanted);
                    self.emit(rule, &caps, &source, out, &mut found);
                    break;
                }
            }
        }
        found
    }

    /// Match cookie names set for the page
    pub fn match_cookies(&self, cookies: &[String], out: &mut ResultSet) -> Vec<FingerprintRecord> {
        let mut found = Vec::new();
        for rule in self.rules.iter().filter(|r| r.source == RuleSource::Cookie) {
            if out.has_fingerprint(rule.name) {
                continue;
            }
            if let Some(caps) = cookies.iter().find_map(|c| rule.pattern.captures(c)) {
                self.emit(rule, &caps, "cookie", out, &mut found);
            }
        }
        found
    }

    /// Match a resource URL referenced by the page
    pub fn match_url(&self, url: &str, out: &mut ResultSet) -> Vec<FingerprintRecord> {
        self.match_source(RuleSource::Url, url, url, out)
    }

    /// Match a chunk of script or page text
    pub fn match_body(
        &self,
        chunk: &str,
        provenance: &str,
        out: &mut ResultSet,
    ) -> Vec<FingerprintRecord> {
        self.match_source(RuleSource::Body, chunk, provenance, out)
    }

    fn match_source(
        &self,
        source: RuleSource,
        text: &str,
        provenance: &str,
        out: &mut ResultSet,
    ) -> Vec<FingerprintRecord> {
        let mut found = Vec::new();
        for rule in self.rules.iter().filter(|r| r.source == source) {
            if out.has_fingerprint(rule.name) {
                continue;
            }
            if let Some(caps) = rule.pattern.captures(text) {
                self.emit(rule, &caps, provenance, out, &mut found);
            }
        }
        found
    }

    fn emit(
        &self,
        rule: &FingerprintRule,
        caps: &Captures<'_>,
        source: &str,
        out: &mut ResultSet,
        found: &mut Vec<FingerprintRecord>,
    ) {
        let fields: Vec<(&str, &str)> = rule
            .fields
            .iter()
            .enumerate()
            .filter_map(|(i, field)| caps.get(i + 1).map(|m| (*field, m.as_str())))
            .collect();

        let version = fields
            .iter()
            .find(|(field, _)| *field == "version")
            .map(|(_, value)| value.to_string());

        let record = FingerprintRecord {
            category: rule.category,
            name: rule.name.to_string(),
            description: describe(rule.name, rule.category, source, &fields),
            version,
            source: source.to_string(),
        };

        if out.add_fingerprint(record.clone()) {
            debug!(name = rule.name, source, "fingerprint matched");
            found.push(record);
        }

        if let Some((category, name)) = rule.auxiliary {
            let implied = FingerprintRecord {
                category,
                name: name.to_string(),
                description: format!(
                    "{} {} inferred from {}",
                    category.label(),
                    name,
                    rule.name
                ),
                version: None,
                source: source.to_string(),
            };
            if out.add_fingerprint(implied.clone()) {
                found.push(implied);
            }
        }
    }
}

fn describe(
    name: &str,
    category: FingerprintCategory,
    source: &str,
    fields: &[(&str, &str)],
) -> String {
    let mut description = format!("Identified {} {} via {}", category.label(), name, source);
    for (field, value) in fields {
        description.push_str(&format!(", {} {}", field, value));
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_tomcat_implies_java_once() {
        let matcher = FingerprintMatcher::new();
        let mut out = ResultSet::new();

        let found = matcher.match_headers(&headers(&[("Server", "Apache-Coyote/1.1")]), &mut out);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "Apache Tomcat");
        assert_eq!(found[0].category, FingerprintCategory::Server);
        assert_eq!(found[0].version.as_deref(), Some("1.1"));
        assert_eq!(found[1].name, "Java");
        assert_eq!(found[1].category, FingerprintCategory::Technology);

        let again = matcher.match_headers(&headers(&[("server", "Apache-Coyote/1.1")]), &mut out);
        assert!(again.is_empty());
        assert_eq!(out.fingerprints().len(), 2);
    }

    #[test]
    fn test_nginx_version() {
        let matcher = FingerprintMatcher::new();
        let mut out = ResultSet::new();
        let found = matcher.match_headers(&headers(&[("server", "nginx/1.18.0")]), &mut out);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].version.as_deref(), Some("1.18.0"));
        assert!(found[0].description.contains("version 1.18.0"));
    }

    #[test]
    fn test_cookie_rules() {
        let matcher = FingerprintMatcher::new();
        let mut out = ResultSet::new();
        let found = matcher.match_cookies(&["JSESSIONID".to_string()], &mut out);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Java");
    }

    #[test]
    fn test_java_not_duplicated_across_sources() {
        let matcher = FingerprintMatcher::new();
        let mut out = ResultSet::new();
        matcher.match_cookies(&["JSESSIONID".to_string()], &mut out);
        let found = matcher.match_headers(&headers(&[("Server", "Apache-Coyote/1.1")]), &mut out);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Apache Tomcat");
    }

    #[test]
    fn test_analytics_url() {
        let matcher = FingerprintMatcher::new();
        let mut out = ResultSet::new();
        let found = matcher.match_url("https://hm.baidu.com/hm.js?abc", &mut out);
        assert_eq!(found[0].category, FingerprintCategory::Analytics);
    }

    #[test]
    fn test_body_builder() {
        let matcher = FingerprintMatcher::new();
        let mut out = ResultSet::new();
        let found = matcher.match_body(
            "(self.webpackChunkapp = self.webpackChunkapp || []).push",
            "https://example.com/app.js",
            &mut out,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Webpack");
        assert_eq!(found[0].source, "https://example.com/app.js");
    }
}
