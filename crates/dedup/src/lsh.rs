use std::collections::HashMap;

use xxhash_rust::xxh3::xxh3_64;

use crate::config::{DedupConfig, DedupError};
use crate::minhash::similarity;

/// Banded locality-sensitive hash index over MinHash signatures.
///
/// Each signature is cut into `bands` runs of `rows` slots; two signatures
/// become candidates when any band hashes to the same bucket. Candidates are
/// confirmed against the full signature before being reported.
#[derive(Debug)]
pub struct LshIndex<K> {
    bands: usize,
    rows: usize,
    threshold: f64,
    buckets: Vec<HashMap<u64, Vec<usize>>>,
    entries: Vec<(K, Vec<u64>)>,
}

/// A confirmed near-duplicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a, K> {
    pub key: &'a K,
    pub similarity: f64,
}

impl<K> LshIndex<K> {
    pub fn new(cfg: &DedupConfig) -> Result<Self, DedupError> {
        cfg.validate()?;
        Ok(Self {
            bands: cfg.bands,
            rows: cfg.rows,
            threshold: cfg.threshold,
            buckets: (0..cfg.bands).map(|_| HashMap::new()).collect(),
            entries: Vec::new(),
        })
    }

    fn signature_len(&self) -> usize {
        self.bands * self.rows
    }

    fn check_len(&self, signature: &[u64]) -> Result<(), DedupError> {
        if signature.len() != self.signature_len() {
            return Err(DedupError::SignatureLength {
                expected: self.signature_len(),
                actual: signature.len(),
            });
        }
        Ok(())
    }

    pub fn insert(&mut self, key: K, signature: Vec<u64>) -> Result<(), DedupError> {
        self.check_len(&signature)?;

        let id = self.entries.len();
        let keys: Vec<u64> = band_keys(&signature, self.rows).collect();
        for (band, bucket_key) in keys.into_iter().enumerate() {
            self.buckets[band].entry(bucket_key).or_default().push(id);
        }
        self.entries.push((key, signature));
        Ok(())
    }

    /// The earliest inserted entry whose similarity to `signature` reaches
    /// the threshold.
    pub fn find_similar(&self, signature: &[u64]) -> Result<Option<Match<'_, K>>, DedupError> {
        self.check_len(signature)?;

        let mut candidates: Vec<usize> = band_keys(signature, self.rows)
            .zip(&self.buckets)
            .filter_map(|(bucket_key, bucket)| bucket.get(&bucket_key))
            .flatten()
            .copied()
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        Ok(candidates.into_iter().find_map(|id| {
            let (key, stored) = &self.entries[id];
            let sim = similarity(stored, signature);
            (sim >= self.threshold).then_some(Match {
                key,
                similarity: sim,
            })
        }))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }
}

fn band_keys(signature: &[u64], rows: usize) -> impl Iterator<Item = u64> + '_ {
    signature.chunks_exact(rows).map(|band| {
        let bytes: Vec<u8> = band.iter().flat_map(|v| v.to_le_bytes()).collect();
        xxh3_64(&bytes)
    })
}
