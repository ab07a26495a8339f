//! Domain-wide keyword signals.
//!
//! *Common site words* are keywords that show up in a salient position on a
//! large share of a domain's pages. *Adjacent site words* are keywords that
//! several pages linking to a page agree on, and that the page itself
//! already considers relevant. Both are written back onto the documents as
//! word flags.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use metadata::{IndexBlock, WordFlag};
use model::{EdgeUrl, ProcessedDocument, ProcessedDomain};

use crate::config::SiteWordsConfig;
use crate::link_graph::InvertedLinkGraph;

/// Blocks whose keywords a page is "about".
const TOP_BLOCKS: [IndexBlock; 2] = [IndexBlock::TfIdfHigh, IndexBlock::Subjects];
/// Blocks a page may be flagged through by its neighbours.
const CANDIDATE_BLOCKS: [IndexBlock; 4] = [
    IndexBlock::TfIdfHigh,
    IndexBlock::Subjects,
    IndexBlock::TfIdfMedium,
    IndexBlock::Title,
];

#[derive(Debug, Clone)]
pub struct CommonKeywordExtractor {
    min_documents: usize,
    min_total_count: usize,
    qualifying_proportion: f64,
    max_keywords: usize,
}

impl CommonKeywordExtractor {
    pub fn new(cfg: &SiteWordsConfig) -> Self {
        Self {
            min_documents: cfg.min_documents,
            min_total_count: cfg.min_total_count,
            qualifying_proportion: cfg.qualifying_proportion,
            max_keywords: cfg.max_keywords,
        }
    }

    /// Keywords of `blocks` that appear in more than the qualifying share of
    /// the keyworded documents, most frequent first, ties by keyword.
    pub fn common_site_words(
        &self,
        documents: &[ProcessedDocument],
        blocks: &[IndexBlock],
    ) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut keyworded = 0usize;

        for words in documents.iter().filter_map(|d| d.words.as_ref()) {
            keyworded += 1;
            for word in words.words_in(blocks) {
                *counts.entry(word).or_default() += 1;
            }
        }

        if keyworded < self.min_documents {
            return Vec::new();
        }
        let total: usize = counts.values().sum();
        if total < self.min_total_count {
            return Vec::new();
        }

        let cutoff = keyworded as f64 * self.qualifying_proportion;
        let mut qualifying: Vec<(&str, usize)> = counts
            .into_iter()
            .filter(|&(_, count)| count as f64 > cutoff)
            .collect();
        qualifying.sort_by_key(|&(word, count)| (Reverse(count), word));
        qualifying.truncate(self.max_keywords);

        qualifying
            .into_iter()
            .map(|(word, _)| word.to_string())
            .collect()
    }
}

/// Per-page top and candidate keywords, gathered before adjacency is
/// computed.
#[derive(Debug, Clone, Default)]
pub struct TopKeywords {
    top: HashMap<EdgeUrl, HashSet<String>>,
    candidates: HashMap<EdgeUrl, HashSet<String>>,
}

impl TopKeywords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, doc: &ProcessedDocument) {
        let (Some(url), Some(words)) = (&doc.url, &doc.words) else {
            return;
        };
        let owned = |blocks: &[IndexBlock]| -> HashSet<String> {
            words
                .words_in(blocks)
                .into_iter()
                .map(str::to_string)
                .collect()
        };
        self.top.insert(url.clone(), owned(&TOP_BLOCKS));
        self.candidates.insert(url.clone(), owned(&CANDIDATE_BLOCKS));
    }

    /// TfIdfHigh and Subjects keywords of `url`.
    pub fn keywords(&self, url: &EdgeUrl) -> Option<&HashSet<String>> {
        self.top.get(url)
    }

    /// Top keywords plus TfIdfMedium and Title keywords of `url`.
    pub fn candidate_keywords(&self, url: &EdgeUrl) -> Option<&HashSet<String>> {
        self.candidates.get(url)
    }
}

#[derive(Debug, Clone)]
pub struct SiteWords {
    extractor: CommonKeywordExtractor,
    adjacent_min_sources: usize,
}

impl SiteWords {
    pub fn new(cfg: &SiteWordsConfig) -> Self {
        Self {
            extractor: CommonKeywordExtractor::new(cfg),
            adjacent_min_sources: cfg.adjacent_min_sources,
        }
    }

    /// Flag common site words on every document. Returns the flagged words.
    pub fn flag_common_site_words(&self, domain: &mut ProcessedDomain) -> HashSet<String> {
        let mut common: HashSet<String> = HashSet::new();
        common.extend(
            self.extractor
                .common_site_words(&domain.documents, &TOP_BLOCKS),
        );
        common.extend(
            self.extractor
                .common_site_words(&domain.documents, &[IndexBlock::Title]),
        );

        if common.is_empty() {
            return common;
        }

        for words in domain.documents.iter_mut().filter_map(|d| d.words.as_mut()) {
            words.set_flag_on_metadata_for_words(WordFlag::Site, &common);
        }
        common
    }

    /// Keywords each linked-to page should be flagged with.
    pub fn adjacent_words(
        &self,
        top: &TopKeywords,
        inverted: &InvertedLinkGraph,
    ) -> HashMap<EdgeUrl, HashSet<String>> {
        let mut linked = HashMap::new();

        for (dest, sources) in inverted.iter() {
            let Some(candidates) = top.candidate_keywords(dest) else {
                continue;
            };

            let mut counts: HashMap<&str, usize> = HashMap::new();
            for source in sources.iter().filter(|s| *s != dest) {
                for keyword in top.keywords(source).into_iter().flatten() {
                    *counts.entry(keyword.as_str()).or_default() += 1;
                }
            }

            let words: HashSet<String> = counts
                .into_iter()
                .filter(|&(word, count)| {
                    count > self.adjacent_min_sources && candidates.contains(word)
                })
                .map(|(word, _)| word.to_string())
                .collect();

            if !words.is_empty() {
                linked.insert(dest.clone(), words);
            }
        }

        linked
    }

    /// Flag adjacent site words. Returns the number of documents touched.
    pub fn flag_adjacent_words(
        &self,
        top: &TopKeywords,
        inverted: &InvertedLinkGraph,
        domain: &mut ProcessedDomain,
    ) -> usize {
        let linked = self.adjacent_words(top, inverted);
        if linked.is_empty() {
            return 0;
        }

        let mut flagged = 0;
        for doc in &mut domain.documents {
            let (Some(url), Some(words)) = (&doc.url, doc.words.as_mut()) else {
                continue;
            };
            if let Some(keywords) = linked.get(url) {
                words.set_flag_on_metadata_for_words(WordFlag::SiteAdjacent, keywords);
                flagged += 1;
            }
        }
        flagged
    }
}
