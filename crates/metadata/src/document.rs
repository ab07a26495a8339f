//! Packed per-document metadata.
//!
//! ```text
//!  63      56 55      48 47      40 39      32 31      24 23      16 15       8 7        0
//! +----------+----------+----------+----------+----------+----------+----------+----------+
//! | reserved | avg sent |   rank   | enc size | topology |   year   | quality  |  flags   |
//! +----------+----------+----------+----------+----------+----------+----------+----------+
//! ```
//!
//! - **flags**: [`DocumentMetadata::FLAG_JAVASCRIPT`]; the other bits are
//!   reserved.
//! - **quality**: document quality as a signed byte (two's complement).
//! - **year**: years since 1995, 0 when unknown.
//! - **topology**: internal plus external in-links, saturating at 255.
//! - **enc size**: bucketed domain size, see [`encode_domain_size`].
//! - **rank**: domain rank hint; 255 means unranked.
//! - **avg sent**: average sentence length in words, saturating.

use serde::{Deserialize, Serialize};

/// Unpacked document metadata.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DocumentMetadata {
    pub flags: u8,
    pub quality: i8,
    pub year: u8,
    pub topology: u8,
    pub enc_size: u8,
    pub rank: u8,
    pub avg_sentence_length: u8,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            flags: 0,
            quality: 0,
            year: 0,
            topology: 0,
            enc_size: 0,
            rank: 255,
            avg_sentence_length: 0,
        }
    }
}

impl DocumentMetadata {
    /// The page runs scripts.
    pub const FLAG_JAVASCRIPT: u8 = 0x01;

    /// Build metadata from a float quality score and page statistics.
    pub fn new(quality: f64, avg_sentence_length: f64, flags: u8) -> Self {
        Self {
            flags,
            quality: quality.round().clamp(f64::from(i8::MIN), f64::from(i8::MAX)) as i8,
            avg_sentence_length: avg_sentence_length.round().clamp(0.0, 255.0) as u8,
            ..Self::default()
        }
    }

    /// Replace the domain size and topology fields, leaving the rest intact.
    pub fn with_size_and_topology(self, domain_size: usize, topology: usize) -> Self {
        Self {
            enc_size: encode_domain_size(domain_size),
            topology: topology.min(usize::from(u8::MAX)) as u8,
            ..self
        }
    }

    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    pub const fn encode(&self) -> u64 {
        (self.flags as u64)
            | ((self.quality as u8 as u64) << 8)
            | ((self.year as u64) << 16)
            | ((self.topology as u64) << 24)
            | ((self.enc_size as u64) << 32)
            | ((self.rank as u64) << 40)
            | ((self.avg_sentence_length as u64) << 48)
    }

    pub const fn decode(encoded: u64) -> Self {
        Self {
            flags: encoded as u8,
            quality: (encoded >> 8) as u8 as i8,
            year: (encoded >> 16) as u8,
            topology: (encoded >> 24) as u8,
            enc_size: (encoded >> 32) as u8,
            rank: (encoded >> 40) as u8,
            avg_sentence_length: (encoded >> 48) as u8,
        }
    }
}

/// Bucket a domain's document count into the 0..=7 size class.
///
/// ```rust
/// use metadata::encode_domain_size;
///
/// assert_eq!(encode_domain_size(3), 0);
/// assert_eq!(encode_domain_size(75), 3);
/// assert_eq!(encode_domain_size(10_000), 7);
/// ```
pub fn encode_domain_size(size: usize) -> u8 {
    match size {
        0..=4 => 0,
        5..=9 => 1,
        10..=49 => 2,
        50..=99 => 3,
        100..=499 => 4,
        500..=999 => 5,
        1000..=4999 => 6,
        _ => 7,
    }
}
