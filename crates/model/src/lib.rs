//! Data model of the crawl converter.
//!
//! Inputs are [`CrawlData`] records as written by the crawler: one
//! [`CrawledDomain`] header followed by [`CrawledDocument`]s. Outputs are a
//! [`ProcessedDomain`] holding one [`ProcessedDocument`] per accepted or
//! rejected page.
//!
//! URLs are carried as raw strings on the input side and as parsed
//! [`EdgeUrl`]s on the output side.

mod crawl;
mod edge;
mod processed;

pub use crate::crawl::{
    CrawlData, CrawledDocument, CrawledDomain, CrawlerDocumentStatus, CrawlerDomainStatus,
};
pub use crate::edge::{EdgeDomain, EdgeUrl, UrlError};
pub use crate::processed::{
    DisqualificationReason, DomainIndexingState, ProcessedDocument, ProcessedDocumentDetails,
    ProcessedDomain, UrlIndexingState,
};
