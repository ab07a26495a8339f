//! Configuration and error types for near-duplicate detection.
//!
//! Signatures are a pure function of `(tokens, config)`; two documents can only
//! be compared when their signatures were built with the same config.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings for signature construction and the LSH band index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DedupConfig {
    /// Words per shingle.
    pub k: usize,
    /// Winnowing window over shingle hashes.
    pub w: usize,
    /// Number of LSH bands.
    pub bands: usize,
    /// MinHash slots per band.
    pub rows: usize,
    /// Seed for token hashing and MinHash permutations.
    pub seed: u64,
    /// Estimated Jaccard similarity at or above which a document is a duplicate.
    pub threshold: f64,
    /// Documents with fewer words are never signed.
    pub min_document_words: usize,
    /// Compute MinHash slots on the rayon pool.
    pub use_parallel: bool,
}

impl DedupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_w(mut self, w: usize) -> Self {
        self.w = w;
        self
    }

    pub fn with_bands(mut self, bands: usize, rows: usize) -> Self {
        self.bands = bands;
        self.rows = rows;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_min_document_words(mut self, words: usize) -> Self {
        self.min_document_words = words;
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Total MinHash length (`bands * rows`).
    pub fn signature_len(&self) -> Result<usize, DedupError> {
        self.bands
            .checked_mul(self.rows)
            .ok_or(DedupError::InvalidConfigSignatureLength {
                bands: self.bands,
                rows: self.rows,
            })
    }

    pub fn validate(&self) -> Result<(), DedupError> {
        if self.k < 1 {
            return Err(DedupError::InvalidConfigK { k: self.k });
        }
        if self.w < 1 {
            return Err(DedupError::InvalidConfigW { w: self.w });
        }
        if self.bands < 1 {
            return Err(DedupError::InvalidConfigBands { bands: self.bands });
        }
        if self.rows < 1 {
            return Err(DedupError::InvalidConfigRows { rows: self.rows });
        }
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(DedupError::InvalidConfigThreshold {
                threshold: self.threshold,
            });
        }
        self.signature_len().map(|_| ())
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            k: 5,
            w: 4,
            bands: 16,
            rows: 8,
            seed: 0xC0DE_D0C5_5EED_0001,
            threshold: 0.9,
            min_document_words: 20,
            use_parallel: false,
        }
    }
}

/// Errors returned by signature construction and the band index.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DedupError {
    #[error("not enough tokens for k={k}")]
    NotEnoughTokens { k: usize },

    #[error("invalid config: k must be >= 1 (got {k})")]
    InvalidConfigK { k: usize },

    #[error("invalid config: w must be >= 1 (got {w})")]
    InvalidConfigW { w: usize },

    #[error("invalid config: bands must be >= 1 (got {bands})")]
    InvalidConfigBands { bands: usize },

    #[error("invalid config: rows must be >= 1 (got {rows})")]
    InvalidConfigRows { rows: usize },

    #[error("invalid config: threshold must be in (0, 1] (got {threshold})")]
    InvalidConfigThreshold { threshold: f64 },

    #[error("invalid config: signature length overflow for bands={bands} rows={rows}")]
    InvalidConfigSignatureLength { bands: usize, rows: usize },

    #[error("signature has {actual} slots, index expects {expected}")]
    SignatureLength { expected: usize, actual: usize },
}
