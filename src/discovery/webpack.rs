// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Bundler chunk-map reconstruction
//!
//! Webpack runtimes build chunk file names at load time:
//!
//! ```text
//! a.p+"static/js/"+({"about":"about"}[e]||e)+"."+{"about":"1f2e","12":"9a8b"}[e]+".chunk.js"
//! ```
//!
//! Those names never appear as string literals, so they are rebuilt from
//! the id to hash map here.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CHUNK_MAP: Regex = Regex::new(
        r#"["']([^"'\s]*)["']\s*\+\s*(?:\(\s*(\{[^{}]*\})\s*\[\s*\w+\s*\]\s*\|\|\s*\w+\s*\)|\w+)\s*\+\s*["']\.["']\s*\+\s*(\{[^{}]*\})\s*\[\s*\w+\s*\]\s*\+\s*["']((?:\.chunk)?\.js)["']"#
    )
    .unwrap();
    static ref MAP_ENTRY: Regex =
        Regex::new(r#"["']?([\w\-./~]+)["']?\s*:\s*["']([^"']+)["']"#).unwrap();
}

/// A chunk map found in a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMap {
    /// Path prefix literal (`static/js/`)
    pub prefix: String,
    /// Optional chunk id to name map
    pub names: HashMap<String, String>,
    /// Chunk id to content hash, in source order
    pub hashes: Vec<(String, String)>,
    /// File suffix (`.js` or `.chunk.js`)
    pub suffix: String,
}

impl ChunkMap {
    /// Synthesized chunk paths, relative to the bundle's public path
    pub fn paths(&self) -> Vec<String> {
        self.hashes
            .iter()
            .map(|(id, hash)| {
                let name = self.names.get(id).unwrap_or(id);
                format!("{}{}.{}{}", self.prefix, name, hash, self.suffix)
            })
            .collect()
    }
}

fn parse_entries(literal: &str) -> Vec<(String, String)> {
    MAP_ENTRY
        .captures_iter(literal)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Find every chunk map in a script
pub fn find_chunk_maps(content: &str) -> Vec<ChunkMap> {
    CHUNK_MAP
        .captures_iter(content)
        .filter_map(|caps| {
            let hashes = parse_entries(&caps[3]);
            if hashes.is_empty() {
                return None;
            }
            let names = caps
                .get(2)
                .map(|m| parse_entries(m.as_str()).into_iter().collect())
                .unwrap_or_default();
            Some(ChunkMap {
                prefix: caps[1].to_string(),
                names,
                hashes,
                suffix: caps[4].to_string(),
            })
        })
        .collect()
}

/// Reconstruct chunk paths from every chunk map in a script
pub fn reconstruct(content: &str) -> Vec<String> {
    find_chunk_maps(content)
        .iter()
        .flat_map(ChunkMap::paths)
        .collect()
}
