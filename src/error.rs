use std::path::PathBuf;

use dedup::DedupError;
use model::UrlError;
use thiserror::Error;

/// Failure reading a crawl data stream.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure converting a whole domain. Document-level problems never surface
/// here; they become disqualified documents or are skipped.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("crawl data stream is empty")]
    EmptyStream,

    #[error("first record of the crawl data stream is not a domain")]
    MissingDomainHeader,

    #[error("invalid domain name {domain:?}: {source}")]
    InvalidDomain {
        domain: String,
        #[source]
        source: UrlError,
    },

    #[error("stream failure: {0}")]
    Stream(#[from] StreamError),

    #[error("deduplicator setup failed: {0}")]
    Dedup(#[from] DedupError),
}

/// Failure processing a single document.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("document has no url")]
    MissingUrl,

    #[error("bad document url: {0}")]
    Url(#[from] UrlError),

    #[error("failed to parse html of {url}: {reason}")]
    Html { url: String, reason: String },

    #[error("failed to sign document: {0}")]
    Signature(#[from] DedupError),
}
