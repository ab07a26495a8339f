//! Word flags.
//!
//! Flags occupy the low byte of a packed [`WordMetadata`](crate::WordMetadata)
//! word. The bit assigned to each flag is part of the index format and must
//! never be reused for something else.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single keyword flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WordFlag {
    /// Tf-idf value above the "high" cut-off.
    TfIdfHigh,
    /// Word appears in a subject-like position (headings).
    Subjects,
    /// Word looks like a name (capitalized mid-sentence, repeated).
    NamesWords,
    /// Word appears in the document title.
    Title,
    /// Word appears in the URL path.
    UrlPath,
    /// Word appears in the URL's domain name.
    UrlDomain,
    /// Word is common across the whole site in salient positions.
    Site,
    /// Word is used by several pages linking to this one.
    SiteAdjacent,
}

impl WordFlag {
    /// All flags in bit order.
    pub const ALL: [WordFlag; 8] = [
        WordFlag::TfIdfHigh,
        WordFlag::Subjects,
        WordFlag::NamesWords,
        WordFlag::Title,
        WordFlag::UrlPath,
        WordFlag::UrlDomain,
        WordFlag::Site,
        WordFlag::SiteAdjacent,
    ];

    /// The flag's bit within the flag byte.
    pub const fn as_bit(self) -> u8 {
        match self {
            WordFlag::TfIdfHigh => 0x01,
            WordFlag::Subjects => 0x02,
            WordFlag::NamesWords => 0x04,
            WordFlag::Title => 0x08,
            WordFlag::UrlPath => 0x10,
            WordFlag::UrlDomain => 0x20,
            WordFlag::Site => 0x40,
            WordFlag::SiteAdjacent => 0x80,
        }
    }
}

/// A set of [`WordFlag`]s backed by one byte.
#[derive(Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct WordFlagSet(u8);

impl WordFlagSet {
    pub const fn empty() -> Self {
        WordFlagSet(0)
    }

    pub const fn from_bits(bits: u8) -> Self {
        WordFlagSet(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn insert(&mut self, flag: WordFlag) {
        self.0 |= flag.as_bit();
    }

    pub fn remove(&mut self, flag: WordFlag) {
        self.0 &= !flag.as_bit();
    }

    pub const fn contains(self, flag: WordFlag) -> bool {
        self.0 & flag.as_bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the contained flags in bit order.
    pub fn iter(self) -> impl Iterator<Item = WordFlag> {
        WordFlag::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl FromIterator<WordFlag> for WordFlagSet {
    fn from_iter<I: IntoIterator<Item = WordFlag>>(iter: I) -> Self {
        let mut set = WordFlagSet::empty();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

impl From<WordFlag> for WordFlagSet {
    fn from(flag: WordFlag) -> Self {
        WordFlagSet(flag.as_bit())
    }
}

impl fmt::Debug for WordFlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_distinct_and_cover_the_byte() {
        let combined = WordFlag::ALL.iter().fold(0u8, |acc, f| {
            assert_eq!(acc & f.as_bit(), 0, "{f:?} overlaps another flag");
            acc | f.as_bit()
        });
        assert_eq!(combined, 0xFF);
    }

    #[test]
    fn insert_and_remove() {
        let mut set = WordFlagSet::empty();
        set.insert(WordFlag::Title);
        set.insert(WordFlag::Site);
        assert!(set.contains(WordFlag::Title));
        assert!(set.contains(WordFlag::Site));
        assert!(!set.contains(WordFlag::UrlPath));

        set.remove(WordFlag::Title);
        assert_eq!(set, WordFlagSet::from(WordFlag::Site));
    }

    #[test]
    fn iter_follows_bit_order() {
        let set: WordFlagSet = [WordFlag::SiteAdjacent, WordFlag::TfIdfHigh, WordFlag::UrlDomain]
            .into_iter()
            .collect();
        let flags: Vec<WordFlag> = set.iter().collect();
        assert_eq!(
            flags,
            vec![WordFlag::TfIdfHigh, WordFlag::UrlDomain, WordFlag::SiteAdjacent]
        );
    }

    #[test]
    fn debug_lists_flags() {
        let set = WordFlagSet::from(WordFlag::Subjects);
        assert_eq!(format!("{set:?}"), "{Subjects}");
    }
}
