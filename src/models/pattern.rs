use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SegmentError;

/// Number of hex characters kept from the MD5 digest of a pattern
pub const DIGEST_LEN: usize = 16;

/// A segmentation pattern as supplied by the pattern database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    /// Raw regular expression text
    pub pattern: String,
}

impl Pattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Content-derived identity of this pattern.
    ///
    /// Raw expressions contain characters that are awkward as keys, so rows in
    /// the instance table refer to patterns by the first 16 hex characters of
    /// the MD5 digest of the expression text.
    pub fn digest(&self) -> String {
        pattern_digest(&self.pattern)
    }

    /// Compile the expression; an invalid pattern is fatal for the batch
    pub fn compile(&self) -> Result<CompiledPattern, SegmentError> {
        let regex = Regex::new(&self.pattern).map_err(|source| SegmentError::InvalidPattern {
            pattern: self.pattern.clone(),
            source,
        })?;

        Ok(CompiledPattern {
            digest: self.digest(),
            regex,
        })
    }
}

/// Digest of a raw pattern string, see [`Pattern::digest`]
pub fn pattern_digest(pattern: &str) -> String {
    let mut hex = format!("{:x}", md5::compute(pattern.as_bytes()));
    hex.truncate(DIGEST_LEN);
    hex
}

/// A pattern ready for scanning
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Stable identity, see [`Pattern::digest`]
    pub digest: String,
    pub regex: Regex,
}

/// Compile a whole pattern set, preserving order.
///
/// The first invalid expression aborts compilation; there is no partial set.
pub fn compile_patterns(patterns: &[Pattern]) -> Result<Vec<CompiledPattern>, SegmentError> {
    patterns.iter().map(Pattern::compile).collect()
}
