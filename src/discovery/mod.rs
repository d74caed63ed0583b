// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Resource discovery
//!
//! Finds script URLs in page and resource content, including chunk files
//! that only exist in a bundler's runtime chunk map.

pub mod path_tree;
pub mod resources;
pub mod webpack;

pub use path_tree::PathTree;
pub use resources::{resolve, ResourceDiscoverer, ResourceRef};
pub use webpack::{find_chunk_maps, reconstruct, ChunkMap};
