//! MinHash signatures over shingle sets.
//!
//! Slot `j` simulates the `j`-th random permutation by rekeying a mixer with
//! a seed-derived key; the slot value is the minimum mixed hash.

use rayon::prelude::*;
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Signature of `unique_shingles` with `len` slots.
///
/// An empty shingle set yields all-`u64::MAX` slots, which never compares
/// equal to a real signature slot in practice.
pub fn minhash(unique_shingles: &[u64], len: usize, seed: u64, parallel: bool) -> Vec<u64> {
    if unique_shingles.is_empty() {
        return vec![u64::MAX; len];
    }

    if parallel {
        (0..len)
            .into_par_iter()
            .map(|slot| min_for_slot(unique_shingles, slot, seed))
            .collect()
    } else {
        (0..len)
            .map(|slot| min_for_slot(unique_shingles, slot, seed))
            .collect()
    }
}

/// Fraction of positions where two signatures agree; the MinHash estimate of
/// Jaccard similarity. Signatures of different lengths compare as 0.0.
pub fn similarity(a: &[u64], b: &[u64]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let equal = a.iter().zip(b).filter(|(x, y)| x == y).count();
    equal as f64 / a.len() as f64
}

#[inline]
fn min_for_slot(unique_shingles: &[u64], slot: usize, seed: u64) -> u64 {
    let key = splitmix64(seed.wrapping_add((slot as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)));
    unique_shingles
        .iter()
        .map(|&s| mix(s, key))
        .min()
        .unwrap_or(u64::MAX)
}

#[inline]
fn mix(x: u64, key: u64) -> u64 {
    let mut h = xxh3_64_with_seed(&x.to_le_bytes(), key);
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^ (h >> 33)
}

#[inline]
pub(crate) fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_fills_with_max() {
        let sig = minhash(&[], 16, 1, false);
        assert_eq!(sig, vec![u64::MAX; 16]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let shingles: Vec<u64> = (0..64).map(|i| i * 31).collect();
        assert_eq!(
            minhash(&shingles, 128, 42, false),
            minhash(&shingles, 128, 42, true)
        );
    }

    #[test]
    fn slots_use_distinct_permutations() {
        let sig = minhash(&[1, 2, 3, 4, 5], 8, 42, false);
        assert_ne!(sig[0], sig[1]);
        assert_ne!(sig[1], sig[2]);
    }

    #[test]
    fn identical_sets_are_fully_similar() {
        let a = minhash(&[10, 20, 30], 64, 7, false);
        let b = minhash(&[30, 10, 20], 64, 7, false);
        assert_eq!(similarity(&a, &b), 1.0);
    }

    #[test]
    fn disjoint_sets_are_dissimilar() {
        let a: Vec<u64> = (0..200).collect();
        let b: Vec<u64> = (1_000..1_200).collect();
        let sim = similarity(&minhash(&a, 128, 7, false), &minhash(&b, 128, 7, false));
        assert!(sim < 0.1, "similarity {sim}");
    }

    #[test]
    fn estimate_tracks_jaccard() {
        // |A ∩ B| = 150, |A ∪ B| = 250 → J = 0.6
        let a: Vec<u64> = (0..200).collect();
        let b: Vec<u64> = (50..250).collect();
        let sim = similarity(&minhash(&a, 256, 3, false), &minhash(&b, 256, 3, false));
        assert!((sim - 0.6).abs() < 0.15, "similarity {sim}");
    }

    #[test]
    fn mismatched_lengths_compare_as_zero() {
        assert_eq!(similarity(&[1, 2], &[1, 2, 3]), 0.0);
        assert_eq!(similarity(&[], &[]), 0.0);
    }

    #[test]
    fn splitmix_avalanches() {
        let diff = (splitmix64(1000) ^ splitmix64(1001)).count_ones();
        assert!(diff > 16);
    }
}
