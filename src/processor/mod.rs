//! Per-document processing.
//!
//! The domain processor hands each crawled document to a
//! [`DocumentProcessor`] and treats its output as data: an accepted document
//! with keywords, or a disqualified stub with a reason. Errors are reserved
//! for documents that cannot be represented at all (no usable URL) and are
//! logged and skipped by the caller.

mod html;

use std::collections::HashMap;

use model::{CrawledDocument, DisqualificationReason, EdgeDomain, EdgeUrl, ProcessedDocument};
use serde::{Deserialize, Serialize};

use crate::error::ProcessingError;

pub use html::HtmlDocumentProcessor;

/// What a document processor may know about the domain a document belongs
/// to.
#[derive(Debug, Clone, Copy)]
pub struct DocumentContext<'a> {
    pub domain: &'a EdgeDomain,
}

impl<'a> DocumentContext<'a> {
    pub fn new(domain: &'a EdgeDomain) -> Self {
        Self { domain }
    }
}

pub trait DocumentProcessor: Send + Sync {
    fn process(
        &self,
        doc: &CrawledDocument,
        ctx: &DocumentContext<'_>,
    ) -> Result<ProcessedDocument, ProcessingError>;

    /// A stub carrying only the URL and `reason`.
    fn disqualified_stub(
        &self,
        doc: &CrawledDocument,
        reason: DisqualificationReason,
    ) -> Result<ProcessedDocument, ProcessingError> {
        let url = parse_document_url(doc)?;
        Ok(ProcessedDocument::disqualified_stub(Some(url), reason))
    }
}

pub(crate) fn parse_document_url(doc: &CrawledDocument) -> Result<EdgeUrl, ProcessingError> {
    let raw = doc
        .url
        .as_deref()
        .filter(|u| !u.is_empty())
        .ok_or(ProcessingError::MissingUrl)?;
    Ok(EdgeUrl::parse(raw)?)
}

/// Document frequencies of stemmed terms over a reference corpus.
///
/// An empty dictionary treats every term as unseen in a corpus of one
/// document, which keeps tf-idf proportional to term frequency alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TermFrequencyDict {
    documents: u64,
    frequencies: HashMap<String, u64>,
}

impl TermFrequencyDict {
    pub fn new(documents: u64) -> Self {
        Self {
            documents,
            frequencies: HashMap::new(),
        }
    }

    pub fn insert(&mut self, stem: impl Into<String>, document_frequency: u64) {
        self.frequencies.insert(stem.into(), document_frequency);
    }

    pub fn documents(&self) -> u64 {
        self.documents
    }

    pub fn document_frequency(&self, stem: &str) -> u64 {
        self.frequencies.get(stem).copied().unwrap_or(0)
    }

    /// Smoothed inverse document frequency, always positive.
    pub fn idf(&self, stem: &str) -> f64 {
        let n = self.documents as f64 + 1.0;
        let df = self.document_frequency(stem) as f64 + 1.0;
        (1.0 + n / df).ln()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for TermFrequencyDict {
    /// Build from `(stem, document_frequency)` pairs. The corpus size is the
    /// largest frequency seen.
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut dict = TermFrequencyDict::default();
        for (stem, df) in iter {
            dict.documents = dict.documents.max(df);
            dict.insert(stem, df);
        }
        dict
    }
}
