//! Word shingles and winnowing.
//!
//! Both passes are linear in the number of tokens.

use std::collections::VecDeque;

use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::minhash::splitmix64;

const ROLLING_BASE: u64 = 1_000_003;

/// Hash every window of `k` consecutive tokens with a polynomial rolling hash.
///
/// Returns an empty vector when `k` is zero or there are fewer than `k` tokens.
pub fn shingle_hashes<S: AsRef<str>>(tokens: &[S], k: usize, seed: u64) -> Vec<u64> {
    if k == 0 || tokens.len() < k {
        return Vec::new();
    }

    let token_hashes: Vec<u64> = tokens
        .iter()
        .map(|t| xxh3_64_with_seed(t.as_ref().as_bytes(), seed))
        .collect();

    let base = ROLLING_BASE ^ splitmix64(seed);
    let drop_factor = (1..k).fold(1u64, |acc, _| acc.wrapping_mul(base));

    let mut hash = token_hashes[..k]
        .iter()
        .fold(0u64, |h, &t| h.wrapping_mul(base).wrapping_add(t));

    let mut out = Vec::with_capacity(tokens.len() - k + 1);
    out.push(hash);
    for (&leaving, &entering) in token_hashes.iter().zip(&token_hashes[k..]) {
        hash = hash
            .wrapping_sub(leaving.wrapping_mul(drop_factor))
            .wrapping_mul(base)
            .wrapping_add(entering);
        out.push(hash);
    }
    out
}

/// Select the minimum hash of every window of `w` shingles.
///
/// Ties go to the rightmost position, and a position selected by consecutive
/// windows is emitted once. A window wider than the input selects the global
/// minimum.
pub fn winnow(hashes: &[u64], w: usize) -> Vec<u64> {
    let window = w.max(1);
    if hashes.is_empty() {
        return Vec::new();
    }

    let mut picked = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::with_capacity(window);
    let mut last: Option<usize> = None;

    for (i, &value) in hashes.iter().enumerate() {
        while queue.back().is_some_and(|&j| value <= hashes[j]) {
            queue.pop_back();
        }
        queue.push_back(i);

        while queue.front().is_some_and(|&j| j + window <= i) {
            queue.pop_front();
        }

        let window_complete = i + 1 >= window || i + 1 == hashes.len();
        if !window_complete {
            continue;
        }
        if let Some(&min_idx) = queue.front() {
            if last != Some(min_idx) {
                picked.push(hashes[min_idx]);
                last = Some(min_idx);
            }
        }
    }

    picked
}
