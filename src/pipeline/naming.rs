// Copyright (c) 2025 Careloom
// SPDX-License-Identifier: BUSL-1.1
//! Artifact filenames derived from recognized reference codes

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

static CODE_PATTERN: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();

/// Reference code printed under each block: the word CARE, optional
/// whitespace, then a run of digits
fn code_pattern() -> &'static Regex {
    CODE_PATTERN.get_or_init(|| Regex::new(r"(?i)CARE\s*\d+").unwrap())
}

fn whitespace_run() -> &'static Regex {
    WHITESPACE_RUN.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Derive the artifact filename for a block.
///
/// If the recognized text contains a reference code, the filename is
/// that code uppercased with each whitespace run collapsed to a single
/// underscore, plus the `.jpg` extension. Blocks without a readable
/// code fall back to a positional name from their 1-based index in
/// reading order.
pub fn resolve_filename(code_text: &str, block_index: usize) -> String {
    match code_pattern().find(code_text) {
        Some(code) => {
            let upper = code.as_str().to_uppercase();
            format!("{}.jpg", whitespace_run().replace_all(&upper, "_"))
        }
        None => format!("block_{}.jpg", block_index + 1),
    }
}

/// Tracker that keeps artifact filenames unique within one sheet
#[derive(Debug, Default)]
pub struct NameRegistry {
    used: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a filename, appending a numeric suffix if it is taken.
    ///
    /// The first taken candidate becomes `name_2.jpg`, the next
    /// `name_3.jpg`, and so on, keeping the claim order deterministic.
    pub fn claim(&mut self, candidate: String) -> String {
        if self.used.insert(candidate.clone()) {
            return candidate;
        }

        let (stem, extension) = match candidate.rsplit_once('.') {
            Some((stem, ext)) => (stem.to_string(), format!(".{ext}")),
            None => (candidate, String::new()),
        };

        let mut n = 2;
        loop {
            let alternative = format!("{stem}_{n}{extension}");
            if self.used.insert(alternative.clone()) {
                return alternative;
            }
            n += 1;
        }
    }
}
