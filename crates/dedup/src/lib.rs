//! Near-duplicate detection for crawled documents.
//!
//! A document's word stream is turned into a fixed-length MinHash signature:
//!
//! 1. **Shingling**: every run of `k` consecutive words is hashed with a
//!    rolling polynomial hash.
//! 2. **Winnowing**: the minimum hash of each window of `w` shingles is kept,
//!    thinning the set while preserving shared runs.
//! 3. **MinHash**: `bands * rows` slots, each the minimum of the winnowed set
//!    under a different keyed mixer.
//!
//! Signatures are compared through an [`LshIndex`], which only confirms
//! candidates whose estimated Jaccard similarity reaches the configured
//! threshold.
//!
//! ```
//! use dedup::{signature, DedupConfig, LshIndex};
//!
//! let cfg = DedupConfig::new().with_k(3);
//! let words: Vec<&str> = "the quick brown fox jumps over the lazy dog again and again"
//!     .split(' ')
//!     .collect();
//!
//! let sig = signature(&words, &cfg).unwrap();
//! let mut index = LshIndex::new(&cfg).unwrap();
//! index.insert("https://example.com/a", sig.clone()).unwrap();
//!
//! let hit = index.find_similar(&sig).unwrap().unwrap();
//! assert_eq!(*hit.key, "https://example.com/a");
//! ```

mod config;
mod lsh;
mod minhash;
mod shingles;

pub use crate::config::{DedupConfig, DedupError};
pub use crate::lsh::{LshIndex, Match};
pub use crate::minhash::similarity;
pub use crate::shingles::{shingle_hashes, winnow};

/// MinHash signature of an ordered word stream.
///
/// Tokens should already be normalized (lowercased, punctuation-free); no
/// normalization happens here.
pub fn signature<S: AsRef<str>>(tokens: &[S], cfg: &DedupConfig) -> Result<Vec<u64>, DedupError> {
    cfg.validate()?;
    if tokens.len() < cfg.k {
        return Err(DedupError::NotEnoughTokens { k: cfg.k });
    }
    let len = cfg.signature_len()?;

    let shingles = shingle_hashes(tokens, cfg.k, cfg.seed);
    let mut unique = winnow(&shingles, cfg.w);
    unique.sort_unstable();
    unique.dedup();

    Ok(minhash::minhash(&unique, len, cfg.seed, cfg.use_parallel))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize, salt: &str) -> Vec<String> {
        (0..n).map(|i| format!("{salt}{i}")).collect()
    }

    #[test]
    fn short_streams_are_rejected() {
        let cfg = DedupConfig::default();
        let err = signature(&["one", "two"], &cfg).unwrap_err();
        assert_eq!(err, DedupError::NotEnoughTokens { k: cfg.k });
    }

    #[test]
    fn signature_is_deterministic_and_sized() {
        let cfg = DedupConfig::default();
        let tokens = words(100, "w");
        let a = signature(&tokens, &cfg).unwrap();
        let b = signature(&tokens, &cfg).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 128);
    }

    #[test]
    fn a_small_edit_stays_above_threshold() {
        let cfg = DedupConfig::default();
        let original = words(1000, "w");
        let mut edited = original.clone();
        edited[999] = "changed".to_string();

        let sim = similarity(
            &signature(&original, &cfg).unwrap(),
            &signature(&edited, &cfg).unwrap(),
        );
        assert!(sim >= cfg.threshold, "similarity {sim}");
    }

    #[test]
    fn unrelated_documents_do_not_match() {
        let cfg = DedupConfig::default();
        let mut index = LshIndex::new(&cfg).unwrap();
        index
            .insert(0usize, signature(&words(200, "a"), &cfg).unwrap())
            .unwrap();

        let probe = signature(&words(200, "b"), &cfg).unwrap();
        assert!(index.find_similar(&probe).unwrap().is_none());
    }
}
