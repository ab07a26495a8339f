//! Crawl-to-index converter.
//!
//! Turns the crawl data of one web domain (a domain header followed by
//! fetched documents) into a [`ProcessedDomain`]: per-document keyword
//! blocks with packed metadata, ready for an index writer.
//!
//! ## What we do
//!
//! - **Repair canonical claims** - blanket and cross-domain canonical links
//!   are rewritten before anything else looks at them
//! - **Process documents** - the bundled [`HtmlDocumentProcessor`] extracts
//!   text, links and keywords, and disqualifies pages it should not index
//! - **Short-circuit bad domains** - optionally stop extracting keywords once
//!   a domain proves to be mostly low quality
//! - **Mark near-duplicates** - MinHash/LSH over document text
//! - **Add domain-wide signals** - link topology, common site words and
//!   adjacent site words
//!
//! ## Main entry point
//!
//! Build a [`DomainProcessor`] and call
//! [`create_writable`](DomainProcessor::create_writable) with a
//! [`CrawlDataStream`]; oversized domains come back as a lazy
//! [`SideloadProcessing`] iterator. [`convert_batch`] runs many domains in
//! parallel.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use converter::{
//!     ConverterConfig, DomainProcessor, HtmlDocumentProcessor, InMemoryCrawlDataStream,
//!     TermFrequencyDict,
//! };
//! use model::{CrawlData, CrawledDocument, CrawledDomain, CrawlerDomainStatus, DomainIndexingState};
//!
//! let config = ConverterConfig::default();
//! let html = HtmlDocumentProcessor::new(
//!     config.document.clone(),
//!     config.dedup.clone(),
//!     Arc::new(TermFrequencyDict::default()),
//! );
//! let processor = DomainProcessor::new(config, Arc::new(html));
//!
//! let stream = InMemoryCrawlDataStream::new([
//!     CrawlData::Domain(CrawledDomain::new("example.com", CrawlerDomainStatus::Ok)),
//!     CrawlData::Document(CrawledDocument::html("https://example.com/", "<p>Hello</p>")),
//! ]);
//!
//! let domain = processor.full_processing(stream).unwrap();
//! assert_eq!(domain.state, DomainIndexingState::Active);
//! assert_eq!(domain.documents.len(), 1);
//! ```

mod batch;
mod canonical;
mod config;
mod decorator;
mod disqualifier;
mod domain;
mod duplicates;
mod error;
mod link_graph;
mod lookup;
mod processor;
mod site_words;
mod stream;

pub use crate::batch::{convert_batch, convert_files};
pub use crate::canonical::fix_bad_canonical_tags;
pub use crate::config::{
    ConfigLoadError, ConverterConfig, DocumentConfig, DomainConfig, SiteWordsConfig,
};
pub use crate::decorator::DocumentDecorator;
pub use crate::disqualifier::DocumentDisqualifier;
pub use crate::domain::{
    ConvertedDomain, DomainProcessor, DomainStatistics, SIDELOAD_DOMAIN_SIZE, SideloadProcessing,
};
pub use crate::duplicates::{DedupStats, DocumentDeduplicator};
pub use crate::error::{ConvertError, ProcessingError, StreamError};
pub use crate::link_graph::{InvertedLinkGraph, LinkGraph};
pub use crate::lookup::{
    AnchorTagsSource, AsnInfo, DomainLinks, GeoIpLookup, NullAnchorTags, NullGeoIp,
    StaticAnchorTags, StaticGeoIp,
};
pub use crate::processor::{
    DocumentContext, DocumentProcessor, HtmlDocumentProcessor, TermFrequencyDict,
};
pub use crate::site_words::{CommonKeywordExtractor, SiteWords, TopKeywords};
pub use crate::stream::{CrawlDataStream, InMemoryCrawlDataStream, JsonlCrawlDataStream};

pub use dedup::DedupConfig;
pub use model::{ProcessedDocument, ProcessedDomain};
