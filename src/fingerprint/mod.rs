// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Technology fingerprinting
//!
//! Rule-table driven detection of servers, frameworks, languages and
//! security products from response headers, cookie names, resource URLs
//! and script bodies.

mod matcher;
mod rules;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use matcher::FingerprintMatcher;
pub use rules::{default_rules, FingerprintRule, RuleSource};

/// Fingerprint category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintCategory {
    Server,
    Os,
    Framework,
    Technology,
    Security,
    Builder,
    Analytics,
}

impl FingerprintCategory {
    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            FingerprintCategory::Server => "server",
            FingerprintCategory::Os => "operating system",
            FingerprintCategory::Framework => "framework",
            FingerprintCategory::Technology => "language",
            FingerprintCategory::Security => "security product/policy",
            FingerprintCategory::Builder => "build tool",
            FingerprintCategory::Analytics => "analytics service",
        }
    }
}

impl fmt::Display for FingerprintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A detected fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintRecord {
    pub category: FingerprintCategory,
    pub name: String,
    pub description: String,
    pub version: Option<String>,
    /// Signal the record came from (`header:server`, `cookie`, a URL, ...)
    pub source: String,
}

/// Per-session name map: at most one record per fingerprint name
#[derive(Debug, Clone, Default)]
pub struct FingerprintLedger {
    names: HashSet<String>,
    records: Vec<FingerprintRecord>,
}

impl FingerprintLedger {
    /// Record a fingerprint; returns false if the name was already present
    pub fn record(&mut self, record: FingerprintRecord) -> bool {
        if !self.names.insert(record.name.clone()) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Check whether a name has been recorded
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Recorded fingerprints in detection order
    pub fn records(&self) -> &[FingerprintRecord] {
        &self.records
    }

    /// Consume into records
    pub fn into_records(self) -> Vec<FingerprintRecord> {
        self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
