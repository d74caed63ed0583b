// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Result categories and the per-session result set
//!
//! A [`ResultSet`] maps every [`Category`] to its findings. Values are
//! deduplicated per category by exact string equality; the first provenance
//! seen for a value is kept.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fingerprint::{FingerprintLedger, FingerprintRecord};

/// Extraction category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Domain,
    /// Root-relative API paths (`/api/user`)
    AbsoluteApi,
    /// Relative API paths (`api/user`)
    Api,
    Ip,
    Phone,
    Email,
    IdCard,
    Jwt,
    AwsKey,
    Credential,
    Cookie,
    IdKey,
    Company,
    Url,
    GithubUrl,
    JsFile,
    ImageFile,
    DocFile,
    VueFile,
    ModuleFile,
    Fingerprint,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 21] = [
        Category::Domain,
        Category::AbsoluteApi,
        Category::Api,
        Category::Ip,
        Category::Phone,
        Category::Email,
        Category::IdCard,
        Category::Jwt,
        Category::AwsKey,
        Category::Credential,
        Category::Cookie,
        Category::IdKey,
        Category::Company,
        Category::Url,
        Category::GithubUrl,
        Category::JsFile,
        Category::ImageFile,
        Category::DocFile,
        Category::VueFile,
        Category::ModuleFile,
        Category::Fingerprint,
    ];

    /// Stable camelCase name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            Category::Domain => "domain",
            Category::AbsoluteApi => "absoluteApi",
            Category::Api => "api",
            Category::Ip => "ip",
            Category::Phone => "phone",
            Category::Email => "email",
            Category::IdCard => "idCard",
            Category::Jwt => "jwt",
            Category::AwsKey => "awsKey",
            Category::Credential => "credential",
            Category::Cookie => "cookie",
            Category::IdKey => "idKey",
            Category::Company => "company",
            Category::Url => "url",
            Category::GithubUrl => "githubUrl",
            Category::JsFile => "jsFile",
            Category::ImageFile => "imageFile",
            Category::DocFile => "docFile",
            Category::VueFile => "vueFile",
            Category::ModuleFile => "moduleFile",
            Category::Fingerprint => "fingerprint",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated, normalized value with the place it was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub value: String,
    /// Resource URL, or `"page"` for the seed document
    pub provenance: String,
}

/// Per-session findings, keyed by category
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    buckets: BTreeMap<Category, BTreeMap<String, String>>,
    fingerprints: FingerprintLedger,
}

impl ResultSet {
    /// Create an empty result set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a finding; returns true if the value is new for the category
    pub fn insert(
        &mut self,
        category: Category,
        value: impl Into<String>,
        provenance: impl Into<String>,
    ) -> bool {
        let bucket = self.buckets.entry(category).or_default();
        let value = value.into();
        if bucket.contains_key(&value) {
            return false;
        }
        bucket.insert(value, provenance.into());
        true
    }

    /// Record a fingerprint; returns true if its name was not seen before
    pub fn add_fingerprint(&mut self, record: FingerprintRecord) -> bool {
        let name = record.name.clone();
        let provenance = record.source.clone();
        if !self.fingerprints.record(record) {
            return false;
        }
        self.insert(Category::Fingerprint, name, provenance);
        true
    }

    /// Check whether a fingerprint name is already recorded
    pub fn has_fingerprint(&self, name: &str) -> bool {
        self.fingerprints.contains(name)
    }

    /// Fingerprint records in insertion order
    pub fn fingerprints(&self) -> &[FingerprintRecord] {
        self.fingerprints.records()
    }

    /// Check whether a value is present in a category
    pub fn contains(&self, category: Category, value: &str) -> bool {
        self.buckets
            .get(&category)
            .is_some_and(|bucket| bucket.contains_key(value))
    }

    /// Findings of a single category
    pub fn findings(&self, category: Category) -> Vec<Finding> {
        self.buckets
            .get(&category)
            .map(|bucket| {
                bucket
                    .iter()
                    .map(|(value, provenance)| Finding {
                        value: value.clone(),
                        provenance: provenance.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Values of a single category
    pub fn values(&self, category: Category) -> Vec<&str> {
        self.buckets
            .get(&category)
            .map(|bucket| bucket.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Number of findings in a category
    pub fn count(&self, category: Category) -> usize {
        self.buckets.get(&category).map_or(0, BTreeMap::len)
    }

    /// Total number of findings across categories
    pub fn total(&self) -> usize {
        self.buckets.values().map(BTreeMap::len).sum()
    }

    /// Check if nothing was found
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Merge another set into this one.
    ///
    /// Returns the number of new findings and the fingerprint records that
    /// were not yet known here.
    pub fn merge(&mut self, other: ResultSet) -> (usize, Vec<FingerprintRecord>) {
        let mut added = 0;
        let mut new_records = Vec::new();

        for record in other.fingerprints.into_records() {
            if self.add_fingerprint(record.clone()) {
                added += 1;
                new_records.push(record);
            }
        }

        for (category, bucket) in other.buckets {
            if category == Category::Fingerprint {
                continue;
            }
            for (value, provenance) in bucket {
                if self.insert(category, value, provenance) {
                    added += 1;
                }
            }
        }

        (added, new_records)
    }

    /// Clear all findings
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.fingerprints = FingerprintLedger::default();
    }

    /// Point-in-time copy for reporting
    pub fn snapshot(&self) -> ResultSnapshot {
        let mut categories = BTreeMap::new();
        for category in Category::ALL {
            let findings = self.findings(category);
            if !findings.is_empty() {
                categories.insert(category, findings);
            }
        }
        ResultSnapshot {
            categories,
            fingerprints: self.fingerprints.records().to_vec(),
        }
    }
}

/// Serializable copy of a result set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSnapshot {
    pub categories: BTreeMap<Category, Vec<Finding>>,
    pub fingerprints: Vec<FingerprintRecord>,
}

impl ResultSnapshot {
    /// Findings per category
    pub fn counts(&self) -> BTreeMap<Category, usize> {
        self.categories
            .iter()
            .map(|(category, findings)| (*category, findings.len()))
            .collect()
    }

    /// Total number of findings
    pub fn total(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Values of one category
    pub fn values(&self, category: Category) -> Vec<&str> {
        self.categories
            .get(&category)
            .map(|f| f.iter().map(|f| f.value.as_str()).collect())
            .unwrap_or_default()
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::FingerprintCategory;

    fn record(name: &str) -> FingerprintRecord {
        FingerprintRecord {
            category: FingerprintCategory::Server,
            name: name.to_string(),
            description: String::new(),
            version: None,
            source: "header".to_string(),
        }
    }

    #[test]
    fn test_insert_dedups_by_value() {
        let mut set = ResultSet::new();
        assert!(set.insert(Category::Domain, "api.example.top", "page"));
        assert!(!set.insert(Category::Domain, "api.example.top", "https://x/app.js"));
        assert!(set.insert(Category::Ip, "api.example.top", "page"));

        assert_eq!(set.count(Category::Domain), 1);
        assert_eq!(set.findings(Category::Domain)[0].provenance, "page");
        assert_eq!(set.total(), 2);
    }

    #[test]
    fn test_merge_counts_only_new() {
        let mut set = ResultSet::new();
        set.insert(Category::Email, "a@b.com", "page");

        let mut delta = ResultSet::new();
        delta.insert(Category::Email, "a@b.com", "js");
        delta.insert(Category::Email, "c@d.com", "js");
        delta.add_fingerprint(record("Nginx"));

        let (added, records) = set.merge(delta);
        assert_eq!(added, 2);
        assert_eq!(records.len(), 1);
        assert!(set.contains(Category::Fingerprint, "Nginx"));

        let mut again = ResultSet::new();
        again.add_fingerprint(record("Nginx"));
        let (added, records) = set.merge(again);
        assert_eq!(added, 0);
        assert!(records.is_empty());
    }

    #[test]
    fn test_snapshot_json_uses_camel_case() {
        let mut set = ResultSet::new();
        set.insert(Category::AbsoluteApi, "/api/user", "page");
        let json = set.snapshot().to_json().unwrap();
        assert!(json.contains("\"absoluteApi\""));
    }
}
