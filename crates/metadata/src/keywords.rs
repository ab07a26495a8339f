use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::block::IndexBlock;
use crate::flags::WordFlag;
use crate::word::WordMetadata;

/// Stemmed keyword to packed [`WordMetadata`].
pub type KeywordSet = BTreeMap<String, u64>;

/// A document's keywords, grouped by [`IndexBlock`].
///
/// Maps are ordered so that serialized output and iteration are stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentKeywords {
    blocks: BTreeMap<IndexBlock, KeywordSet>,
}

impl DocumentKeywords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a keyword's metadata in `block`.
    pub fn add(&mut self, block: IndexBlock, word: impl Into<String>, metadata: u64) {
        self.blocks
            .entry(block)
            .or_default()
            .insert(word.into(), metadata);
    }

    /// Add flagless terms to `block`, keeping any metadata already present.
    pub fn add_terms<I, S>(&mut self, block: IndexBlock, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = self.blocks.entry(block).or_default();
        for term in terms {
            set.entry(term.into()).or_insert(0);
        }
    }

    pub fn get(&self, block: IndexBlock) -> Option<&KeywordSet> {
        self.blocks.get(&block).filter(|set| !set.is_empty())
    }

    pub fn metadata(&self, block: IndexBlock, word: &str) -> Option<u64> {
        self.blocks.get(&block)?.get(word).copied()
    }

    pub fn contains(&self, block: IndexBlock, word: &str) -> bool {
        self.blocks
            .get(&block)
            .is_some_and(|set| set.contains_key(word))
    }

    /// Keywords of `block`, in order.
    pub fn words(&self, block: IndexBlock) -> impl Iterator<Item = &str> {
        self.blocks
            .get(&block)
            .into_iter()
            .flat_map(|set| set.keys().map(String::as_str))
    }

    /// Union of the keywords of several blocks.
    pub fn words_in(&self, blocks: &[IndexBlock]) -> HashSet<&str> {
        blocks.iter().flat_map(|b| self.words(*b)).collect()
    }

    /// OR `flag` into the metadata of every occurrence of `words` in the
    /// page-data blocks. Meta blocks are never touched.
    pub fn set_flag_on_metadata_for_words(&mut self, flag: WordFlag, words: &HashSet<String>) {
        if words.is_empty() {
            return;
        }

        for block in IndexBlock::ALL {
            if !block.is_page_data() {
                continue;
            }
            let Some(set) = self.blocks.get_mut(&block) else {
                continue;
            };
            for (word, meta) in set.iter_mut() {
                if words.contains(word) {
                    *meta = WordMetadata::with_flag_encoded(*meta, flag);
                }
            }
        }
    }

    /// `(block, keyword, metadata)` triples over all blocks.
    pub fn iter(&self) -> impl Iterator<Item = (IndexBlock, &str, u64)> {
        self.blocks.iter().flat_map(|(block, set)| {
            set.iter()
                .map(move |(word, meta)| (*block, word.as_str(), *meta))
        })
    }

    /// Total keyword entries across blocks.
    pub fn len(&self) -> usize {
        self.blocks.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
