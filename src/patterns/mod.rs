// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Pattern library
//!
//! Compiled extraction patterns and the word lists their filters consult.

pub mod library;
pub mod lists;

pub use library::{
    is_third_party_script, pattern_table, Boundary, ContentKind, PatternDef, PatternKind,
    Variant,
};
