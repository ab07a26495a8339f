use dedup::{DedupConfig, DedupError, LshIndex};
use model::{EdgeUrl, ProcessedDocument};
use tracing::warn;

/// Counters reported when a [`DocumentDeduplicator`] is closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupStats {
    /// Documents that were compared against the index.
    pub checked: usize,
    pub duplicates: usize,
}

/// Marks near-duplicate documents within one domain.
///
/// The first document of a group of near-duplicates stays unmarked; later
/// ones get `duplicate_of` pointing at it. Content is never removed.
#[derive(Debug)]
pub struct DocumentDeduplicator {
    index: Option<LshIndex<EdgeUrl>>,
    min_document_words: usize,
    stats: DedupStats,
}

impl DocumentDeduplicator {
    pub fn new(cfg: &DedupConfig) -> Result<Self, DedupError> {
        Ok(Self {
            index: Some(LshIndex::new(cfg)?),
            min_document_words: cfg.min_document_words,
            stats: DedupStats::default(),
        })
    }

    /// Returns whether `doc` was marked. Documents without a URL, details or
    /// signature, and short documents, are passed over.
    pub fn mark_if_duplicate(&mut self, doc: &mut ProcessedDocument) -> bool {
        let Some(index) = self.index.as_mut() else {
            return false;
        };
        let (Some(url), Some(details)) = (&doc.url, &doc.details) else {
            return false;
        };
        if details.signature.is_empty() || details.length < self.min_document_words {
            return false;
        }

        self.stats.checked += 1;
        let original = match index.find_similar(&details.signature) {
            Ok(found) => found.map(|m| m.key.clone()),
            Err(err) => {
                warn!(error = %err, url = %url, "dedup_signature_rejected");
                return false;
            }
        };

        match original {
            Some(original) => {
                self.stats.duplicates += 1;
                doc.duplicate_of = Some(original);
                true
            }
            None => {
                if let Err(err) = index.insert(url.clone(), details.signature.clone()) {
                    warn!(error = %err, url = %url, "dedup_signature_rejected");
                }
                false
            }
        }
    }

    /// Drop the index and report what was seen. Later calls to
    /// [`mark_if_duplicate`](Self::mark_if_duplicate) mark nothing.
    pub fn close(&mut self) -> DedupStats {
        self.index = None;
        self.stats
    }

    pub fn stats(&self) -> DedupStats {
        self.stats
    }
}
