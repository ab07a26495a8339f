use std::fmt;

use metadata::{DocumentKeywords, DocumentMetadata};
use serde::{Deserialize, Serialize};

use crate::edge::{EdgeDomain, EdgeUrl};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrlIndexingState {
    Ok,
    Disqualified,
}

/// Why a document was left out of the index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisqualificationReason {
    /// The crawler did not fetch the document successfully.
    Status,
    /// Unsupported content type, or no body.
    Content,
    /// The document declares another page on its site as canonical.
    Canonical,
    Length,
    Language,
    Quality,
    /// The domain as a whole fell below the quality bar.
    ShortCircuit,
}

impl DisqualificationReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            DisqualificationReason::Status => "STATUS",
            DisqualificationReason::Content => "CONTENT",
            DisqualificationReason::Canonical => "CANONICAL",
            DisqualificationReason::Length => "LENGTH",
            DisqualificationReason::Language => "LANGUAGE",
            DisqualificationReason::Quality => "QUALITY",
            DisqualificationReason::ShortCircuit => "SHORT_CIRCUIT",
        }
    }
}

impl fmt::Display for DisqualificationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document-level facts extracted by a document processor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProcessedDocumentDetails {
    pub title: String,
    pub description: String,
    /// Length of the extracted text, in words.
    pub length: usize,
    pub quality: f64,
    pub links_internal: Vec<EdgeUrl>,
    pub links_external: Vec<EdgeUrl>,
    pub metadata: DocumentMetadata,
    /// MinHash signature of the document text; empty when the text was too
    /// short to sign.
    #[serde(default)]
    pub signature: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessedDocument {
    pub url: Option<EdgeUrl>,
    pub state: UrlIndexingState,
    pub state_reason: Option<DisqualificationReason>,
    pub details: Option<ProcessedDocumentDetails>,
    pub words: Option<DocumentKeywords>,
    /// URL of an earlier document in the same domain with near-identical text.
    #[serde(default)]
    pub duplicate_of: Option<EdgeUrl>,
}

impl ProcessedDocument {
    pub fn accepted(url: EdgeUrl, details: ProcessedDocumentDetails, words: DocumentKeywords) -> Self {
        Self {
            url: Some(url),
            state: UrlIndexingState::Ok,
            state_reason: None,
            details: Some(details),
            words: Some(words),
            duplicate_of: None,
        }
    }

    /// A document that carries only its URL and the reason it was rejected.
    pub fn disqualified_stub(url: Option<EdgeUrl>, reason: DisqualificationReason) -> Self {
        Self {
            url,
            state: UrlIndexingState::Disqualified,
            state_reason: Some(reason),
            details: None,
            words: None,
            duplicate_of: None,
        }
    }

    /// Accepted, with both details and keywords.
    pub fn is_processed_fully(&self) -> bool {
        self.state == UrlIndexingState::Ok && self.details.is_some() && self.words.is_some()
    }

    pub fn is_disqualified(&self) -> bool {
        self.state == UrlIndexingState::Disqualified
    }

    pub fn quality(&self) -> Option<f64> {
        self.details.as_ref().map(|d| d.quality)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainIndexingState {
    Active,
    Redir,
    Blocked,
    Error,
}

/// A converted domain, ready for the index writer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessedDomain {
    pub domain: EdgeDomain,
    pub ip: Option<String>,
    pub redirect: Option<EdgeDomain>,
    pub state: DomainIndexingState,
    #[serde(default)]
    pub documents: Vec<ProcessedDocument>,
}

impl ProcessedDomain {
    pub fn fully_processed(&self) -> impl Iterator<Item = &ProcessedDocument> {
        self.documents.iter().filter(|d| d.is_processed_fully())
    }

    pub fn size(&self) -> usize {
        self.documents.len()
    }
}
