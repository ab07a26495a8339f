use std::collections::HashMap;

use crate::flags::{WordFlag, WordFlagSet};
use crate::word::WordMetadata;

/// Tf-idf above which a word counts as highly relevant.
pub const TF_IDF_HIGH_LIMIT: i32 = 100;
/// Tf-idf above which a word counts as moderately relevant.
pub const TF_IDF_MEDIUM_LIMIT: i32 = 50;

/// Number of consecutive sentences covered by one position bit.
pub const SENTENCES_PER_POSITION_BIT: usize = 4;

/// Collects per-word signals for one document and packs them into
/// [`WordMetadata`] words.
///
/// Structural flags are recorded per stem with [`KeywordMetadata::mark`];
/// [`WordFlag::TfIdfHigh`] is derived from the recorded tf-idf value.
///
/// ```rust
/// use metadata::{KeywordMetadata, WordFlag, WordMetadata};
///
/// let mut kw = KeywordMetadata::new();
/// kw.mark(WordFlag::Title, "rust");
/// kw.set_tf_idf("rust", 140);
/// kw.add_position("rust", 9);
///
/// let meta = WordMetadata::decode(kw.metadata_for_word("rust"));
/// assert!(meta.flags.contains(WordFlag::Title));
/// assert!(meta.flags.contains(WordFlag::TfIdfHigh));
/// assert_eq!(meta.positions, 1 << 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeywordMetadata {
    flags: HashMap<String, WordFlagSet>,
    tf_idf: HashMap<String, i32>,
    positions: HashMap<String, u32>,
}

impl KeywordMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, flag: WordFlag, stem: &str) {
        self.flags.entry(stem.to_string()).or_default().insert(flag);
    }

    pub fn mark_all<'a, I>(&mut self, flag: WordFlag, stems: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for stem in stems {
            self.mark(flag, stem);
        }
    }

    pub fn set_tf_idf(&mut self, stem: &str, value: i32) {
        self.tf_idf.insert(stem.to_string(), value);
    }

    /// Record an occurrence of `stem` in sentence `sentence_index`.
    pub fn add_position(&mut self, stem: &str, sentence_index: usize) {
        *self.positions.entry(stem.to_string()).or_default() |= position_bit(sentence_index);
    }

    pub fn tf_idf(&self, stem: &str) -> i32 {
        self.tf_idf.get(stem).copied().unwrap_or(0)
    }

    pub fn flags_for_word(&self, stem: &str) -> WordFlagSet {
        let mut flags = self.flags.get(stem).copied().unwrap_or_default();
        if self.tf_idf(stem) > TF_IDF_HIGH_LIMIT {
            flags.insert(WordFlag::TfIdfHigh);
        }
        flags
    }

    /// Packed metadata for `stem`. Unknown stems encode to zero.
    pub fn metadata_for_word(&self, stem: &str) -> u64 {
        let positions = self.positions.get(stem).copied().unwrap_or(0);
        WordMetadata::new(self.tf_idf(stem), positions, self.flags_for_word(stem)).encode()
    }
}

/// Position bit for a sentence; sentences past the last bit share it.
pub fn position_bit(sentence_index: usize) -> u32 {
    let bit = (sentence_index / SENTENCES_PER_POSITION_BIT).min(31);
    1u32 << bit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_word_is_zero() {
        assert_eq!(KeywordMetadata::new().metadata_for_word("nothing"), 0);
    }

    #[test]
    fn tf_idf_high_is_derived() {
        let mut kw = KeywordMetadata::new();
        kw.set_tf_idf("edge", TF_IDF_HIGH_LIMIT);
        kw.set_tf_idf("above", TF_IDF_HIGH_LIMIT + 1);

        assert!(!kw.flags_for_word("edge").contains(WordFlag::TfIdfHigh));
        assert!(kw.flags_for_word("above").contains(WordFlag::TfIdfHigh));
    }

    #[test]
    fn late_sentences_share_the_last_bit() {
        assert_eq!(position_bit(0), 1);
        assert_eq!(position_bit(3), 1);
        assert_eq!(position_bit(4), 2);
        assert_eq!(position_bit(124), 1 << 31);
        assert_eq!(position_bit(10_000), 1 << 31);
    }

    #[test]
    fn every_structural_flag_is_carried() {
        let mut kw = KeywordMetadata::new();
        kw.mark_all(WordFlag::Subjects, ["kernel"]);
        kw.mark(WordFlag::NamesWords, "kernel");
        kw.mark(WordFlag::UrlPath, "kernel");
        kw.mark(WordFlag::UrlDomain, "kernel");
        kw.add_position("kernel", 0);
        kw.add_position("kernel", 8);

        let meta = WordMetadata::decode(kw.metadata_for_word("kernel"));
        let flags: Vec<WordFlag> = meta.flags.iter().collect();
        assert_eq!(
            flags,
            vec![
                WordFlag::Subjects,
                WordFlag::NamesWords,
                WordFlag::UrlPath,
                WordFlag::UrlDomain
            ]
        );
        assert_eq!(meta.positions, 0b101);
    }
}
