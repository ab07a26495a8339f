//! Packed per-word metadata.
//!
//! Every (document, stemmed keyword) pair handed to the index writer carries
//! one `u64`. The layout below is shared with the index reader and is fixed;
//! changing it breaks every index built before the change.
//!
//! ```text
//!  63                              32 31      24 23              8 7        0
//! +----------------------------------+----------+-----------------+----------+
//! |          positions (u32)         | reserved |   tf-idf (u16)  |  flags   |
//! +----------------------------------+----------+-----------------+----------+
//! ```
//!
//! - **flags** (bits 0..8): a [`WordFlagSet`], see [`WordFlag::as_bit`].
//! - **tf-idf** (bits 8..24): the word's tf-idf value, clamped to
//!   `0..=u16::MAX`.
//! - **reserved** (bits 24..32): always zero.
//! - **positions** (bits 32..64): bitmask of coarse positions in the document
//!   where the word occurs; bit `n` covers a fixed run of sentences.
//!
//! Fields are listed from the high bits down: positions, tf-idf, flags.
//! Flags sit in the low byte so that a flag is set on an encoded word with a
//! single OR of [`WordFlag::as_bit`] ([`WordMetadata::with_flag_encoded`]),
//! without unpacking and without disturbing the other fields.

use serde::{Deserialize, Serialize};

use crate::flags::{WordFlag, WordFlagSet};

const FLAGS_MASK: u64 = 0xFF;
const TF_IDF_SHIFT: u32 = 8;
const TF_IDF_MASK: u64 = 0xFFFF;
const POSITIONS_SHIFT: u32 = 32;
const POSITIONS_MASK: u64 = 0xFFFF_FFFF;

/// Unpacked form of a keyword's metadata word.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct WordMetadata {
    pub tf_idf: u16,
    pub positions: u32,
    pub flags: WordFlagSet,
}

impl WordMetadata {
    /// Build metadata from raw signals; `tf_idf` is clamped into range.
    pub fn new(tf_idf: i32, positions: u32, flags: WordFlagSet) -> Self {
        Self {
            tf_idf: tf_idf.clamp(0, i32::from(u16::MAX)) as u16,
            positions,
            flags,
        }
    }

    /// Pack into the index word.
    pub const fn encode(&self) -> u64 {
        (self.flags.bits() as u64)
            | ((self.tf_idf as u64) << TF_IDF_SHIFT)
            | ((self.positions as u64) << POSITIONS_SHIFT)
    }

    /// Unpack an index word. Reserved bits are ignored.
    pub const fn decode(encoded: u64) -> Self {
        Self {
            tf_idf: ((encoded >> TF_IDF_SHIFT) & TF_IDF_MASK) as u16,
            positions: ((encoded >> POSITIONS_SHIFT) & POSITIONS_MASK) as u32,
            flags: WordFlagSet::from_bits((encoded & FLAGS_MASK) as u8),
        }
    }

    pub const fn has_flag(encoded: u64, flag: WordFlag) -> bool {
        encoded & (flag.as_bit() as u64) != 0
    }

    /// OR `flag` into an already packed word.
    pub const fn with_flag_encoded(encoded: u64, flag: WordFlag) -> u64 {
        encoded | flag.as_bit() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_flag_subset_roundtrips() {
        for bits in 0..=u8::MAX {
            let meta = WordMetadata {
                tf_idf: 1234,
                positions: 0xA5A5_0F0F,
                flags: WordFlagSet::from_bits(bits),
            };
            assert_eq!(WordMetadata::decode(meta.encode()), meta, "bits={bits:#04x}");
        }
    }

    #[test]
    fn every_single_position_bit_roundtrips() {
        for bit in 0..32 {
            let meta = WordMetadata::new(7, 1 << bit, WordFlag::Title.into());
            let back = WordMetadata::decode(meta.encode());
            assert_eq!(back.positions, 1 << bit);
            assert_eq!(back.flags, WordFlagSet::from(WordFlag::Title));
            assert_eq!(back.tf_idf, 7);
        }
    }

    #[test]
    fn layout_is_fixed() {
        let meta = WordMetadata {
            tf_idf: 0x1234,
            positions: 0x89AB_CDEF,
            flags: WordFlagSet::from_bits(0x5A),
        };
        assert_eq!(meta.encode(), 0x89AB_CDEF_0012_345A);
    }

    #[test]
    fn tf_idf_is_clamped() {
        assert_eq!(WordMetadata::new(-5, 0, WordFlagSet::empty()).tf_idf, 0);
        assert_eq!(WordMetadata::new(1 << 20, 0, WordFlagSet::empty()).tf_idf, u16::MAX);
    }

    #[test]
    fn setting_a_flag_preserves_other_fields() {
        let original = WordMetadata::new(300, 0b1011, WordFlag::Subjects.into()).encode();
        let flagged = WordMetadata::with_flag_encoded(original, WordFlag::Site);

        let back = WordMetadata::decode(flagged);
        assert_eq!(back.tf_idf, 300);
        assert_eq!(back.positions, 0b1011);
        assert!(back.flags.contains(WordFlag::Subjects));
        assert!(back.flags.contains(WordFlag::Site));
        assert!(WordMetadata::has_flag(flagged, WordFlag::Site));
        assert!(!WordMetadata::has_flag(original, WordFlag::Site));

        // OR-merge is idempotent
        assert_eq!(WordMetadata::with_flag_encoded(flagged, WordFlag::Site), flagged);
    }

    #[test]
    fn reserved_bits_are_ignored_on_decode() {
        let encoded = WordMetadata::new(1, 1, WordFlag::Title.into()).encode() | 0xFF00_0000;
        let back = WordMetadata::decode(encoded);
        assert_eq!(back.encode(), encoded & !0xFF00_0000);
    }
}
