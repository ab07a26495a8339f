//! Body hashing for canonical-claim bookkeeping.
//!
//! Crawl records normally carry the body hash computed by the crawler. When
//! they don't, the converter derives one here so that "distinct bodies
//! claiming the same canonical" can still be counted.
//!
//! ```text
//! SHA-256(body_bytes) → lowercase hex
//! ```

use sha2::{Digest, Sha256};

/// Hash a document body with SHA-256 and return a hex digest.
///
/// # Examples
///
/// ```rust
/// use text::hash_body;
///
/// let hash = hash_body("<html>hello</html>");
/// assert_eq!(hash.len(), 64);
/// assert_eq!(hash, hash_body("<html>hello</html>"));
/// ```
pub fn hash_body(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    hex::encode(hasher.finalize())
}
