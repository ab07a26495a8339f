//! Domain conversion.
//!
//! A [`DomainProcessor`] turns one domain's crawl data stream into a
//! [`ProcessedDomain`]. Small domains are materialized and converted in one
//! go ([`DomainProcessor::full_processing`]); oversized ones are converted
//! lazily, one document per pull ([`SideloadProcessing`]).
//!
//! Both modes run every document through the same per-domain
//! [`DocumentPipeline`]: URL dedupe, the short-circuit disqualifier, the
//! document processor, the decorator and the near-duplicate check.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use model::{
    CrawlData, CrawledDocument, CrawledDomain, CrawlerDomainStatus, DisqualificationReason,
    DomainIndexingState, EdgeDomain, ProcessedDocument, ProcessedDomain, UrlIndexingState,
};
use tracing::{Level, debug, info, span, warn};

use crate::canonical::fix_bad_canonical_tags;
use crate::config::ConverterConfig;
use crate::decorator::DocumentDecorator;
use crate::disqualifier::DocumentDisqualifier;
use crate::duplicates::{DedupStats, DocumentDeduplicator};
use crate::error::{ConvertError, StreamError};
use crate::link_graph::LinkGraph;
use crate::lookup::{AnchorTagsSource, DomainLinks, GeoIpLookup, NullAnchorTags, NullGeoIp};
use crate::processor::{DocumentContext, DocumentProcessor};
use crate::site_words::{SiteWords, TopKeywords};
use crate::stream::CrawlDataStream;

/// Domain size assumed for documents converted in sideload mode, where the
/// real size is unknown until the stream is exhausted.
pub const SIDELOAD_DOMAIN_SIZE: usize = 10_000;

/// Quality offered to the disqualifier for documents rejected on language.
const LANGUAGE_PENALTY: f64 = -100.0;

/// Outcome of [`DomainProcessor::create_writable`].
pub enum ConvertedDomain<'p, S: CrawlDataStream> {
    Full(ProcessedDomain),
    Sideload(SideloadProcessing<'p, S>),
}

impl<S: CrawlDataStream> ConvertedDomain<'_, S> {
    /// Materialize either mode into a complete domain.
    pub fn into_processed_domain(self) -> ProcessedDomain {
        match self {
            ConvertedDomain::Full(domain) => domain,
            ConvertedDomain::Sideload(sideload) => sideload.into_processed_domain(),
        }
    }

    pub fn is_sideload(&self) -> bool {
        matches!(self, ConvertedDomain::Sideload(_))
    }
}

/// Signals computed over a materialized domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainStatistics {
    /// Source pages with internal links.
    pub link_graph_size: usize,
    pub site_words: usize,
    /// Documents that received adjacent site words.
    pub adjacent_documents: usize,
}

pub struct DomainProcessor {
    config: ConverterConfig,
    processor: Arc<dyn DocumentProcessor>,
    geo_ip: Arc<dyn GeoIpLookup>,
    anchor_tags: Arc<dyn AnchorTagsSource>,
    site_words: SiteWords,
}

impl DomainProcessor {
    /// A processor without GeoIP or anchor tag data.
    pub fn new(config: ConverterConfig, processor: Arc<dyn DocumentProcessor>) -> Self {
        let site_words = SiteWords::new(&config.site_words);
        Self {
            config,
            processor,
            geo_ip: Arc::new(NullGeoIp),
            anchor_tags: Arc::new(NullAnchorTags),
            site_words,
        }
    }

    pub fn with_geo_ip(mut self, geo_ip: Arc<dyn GeoIpLookup>) -> Self {
        self.geo_ip = geo_ip;
        self
    }

    pub fn with_anchor_tags(mut self, anchor_tags: Arc<dyn AnchorTagsSource>) -> Self {
        self.anchor_tags = anchor_tags;
        self
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert `stream`, picking sideload mode when the stream reports a size
    /// above the configured threshold.
    pub fn create_writable<S: CrawlDataStream>(
        &self,
        stream: S,
    ) -> Result<ConvertedDomain<'_, S>, ConvertError> {
        let oversized = stream
            .size_bytes()
            .is_some_and(|size| size > self.config.domain.sideload_threshold_bytes);

        if oversized {
            self.sideload_processing(stream).map(ConvertedDomain::Sideload)
        } else {
            self.full_processing(stream).map(ConvertedDomain::Full)
        }
    }

    /// Convert a whole domain in memory.
    pub fn full_processing<S: CrawlDataStream>(
        &self,
        mut stream: S,
    ) -> Result<ProcessedDomain, ConvertError> {
        let started = Instant::now();
        let crawled = read_domain_header(&mut stream)?;

        let span = span!(Level::INFO, "convert.domain", domain = %crawled.domain, mode = "full");
        let _guard = span.enter();

        let mut domain = self.process_domain(&crawled)?;
        let decorator = self.decorator_for(&domain);

        let mut crawled_docs = Vec::new();
        while let Some(record) = stream.next() {
            match record {
                Ok(CrawlData::Document(doc)) => crawled_docs.push(doc),
                Ok(CrawlData::Domain(extra)) => {
                    debug!(domain = %extra.domain, "extra_domain_record_ignored");
                }
                Err(err @ StreamError::Parse { .. }) => {
                    warn!(error = %err, "crawl_record_skipped");
                }
                Err(err) => {
                    stream.close();
                    return Err(err.into());
                }
            }
        }
        stream.close();

        fix_bad_canonical_tags(&mut crawled_docs);

        let mut pipeline = DocumentPipeline::new(self, &domain.domain, decorator)?;
        domain.documents = crawled_docs
            .iter()
            .filter_map(|doc| pipeline.convert(doc))
            .collect();
        let (decorator, dedup_stats, disqualifier) = pipeline.finish();

        let stats = self.calculate_statistics(&mut domain, decorator.links());

        info!(
            documents = domain.size(),
            accepted = domain.fully_processed().count(),
            duplicates = dedup_stats.duplicates,
            site_words = stats.site_words,
            adjacent_documents = stats.adjacent_documents,
            qualified = disqualifier.is_qualified(),
            elapsed_micros = started.elapsed().as_micros() as u64,
            "domain_converted"
        );

        Ok(domain)
    }

    /// Start a lazy conversion. The domain header is read and processed now;
    /// documents are converted as the returned iterator is pulled.
    pub fn sideload_processing<S: CrawlDataStream>(
        &self,
        mut stream: S,
    ) -> Result<SideloadProcessing<'_, S>, ConvertError> {
        let crawled = read_domain_header(&mut stream)?;
        let domain = self.process_domain(&crawled)?;
        let decorator = self.decorator_for(&domain);

        info!(domain = %domain.domain, size_bytes = ?stream.size_bytes(), "domain_sideload_started");

        let pipeline = DocumentPipeline::new(self, &domain.domain, decorator)?;
        Ok(SideloadProcessing {
            owner: self,
            stream,
            domain,
            pipeline,
            closed: false,
        })
    }

    /// Build the domain record from its crawl header. Documents are left
    /// empty.
    pub fn process_domain(&self, crawled: &CrawledDomain) -> Result<ProcessedDomain, ConvertError> {
        let domain: EdgeDomain =
            crawled
                .domain
                .parse()
                .map_err(|source| ConvertError::InvalidDomain {
                    domain: crawled.domain.clone(),
                    source,
                })?;

        let redirect = crawled
            .redirect_domain
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(EdgeDomain::new);

        Ok(ProcessedDomain {
            domain,
            ip: crawled.ip.clone(),
            redirect,
            state: indexing_state(crawled.status()),
            documents: Vec::new(),
        })
    }

    /// Link graph, size and topology, then common and adjacent site words.
    pub fn calculate_statistics(
        &self,
        domain: &mut ProcessedDomain,
        external_links: &DomainLinks,
    ) -> DomainStatistics {
        let mut graph = LinkGraph::new();
        let mut top = TopKeywords::new();
        for doc in &domain.documents {
            graph.add(doc);
            top.accept(doc);
        }
        let inverted = graph.invert();
        let size = graph.size();

        for doc in &mut domain.documents {
            let (Some(url), Some(details)) = (&doc.url, doc.details.as_mut()) else {
                continue;
            };
            let topology = inverted.num_links(url) + external_links.count_for_url(url);
            details.metadata = details.metadata.with_size_and_topology(size, topology);
        }

        let common = self.site_words.flag_common_site_words(domain);
        let adjacent_documents = self.site_words.flag_adjacent_words(&top, &inverted, domain);

        DomainStatistics {
            link_graph_size: size,
            site_words: common.len(),
            adjacent_documents,
        }
    }

    fn decorator_for(&self, domain: &ProcessedDomain) -> DocumentDecorator {
        DocumentDecorator::new(
            &domain.domain,
            domain.ip.as_deref(),
            self.geo_ip.as_ref(),
            self.anchor_tags.as_ref(),
        )
    }
}

fn read_domain_header<S: CrawlDataStream>(stream: &mut S) -> Result<CrawledDomain, ConvertError> {
    match stream.next() {
        None => Err(ConvertError::EmptyStream),
        Some(Err(err)) => Err(err.into()),
        Some(Ok(CrawlData::Domain(domain))) => Ok(domain),
        Some(Ok(CrawlData::Document(_))) => Err(ConvertError::MissingDomainHeader),
    }
}

fn indexing_state(status: CrawlerDomainStatus) -> DomainIndexingState {
    match status {
        CrawlerDomainStatus::Ok => DomainIndexingState::Active,
        CrawlerDomainStatus::Redirect => DomainIndexingState::Redir,
        CrawlerDomainStatus::Blocked => DomainIndexingState::Blocked,
        CrawlerDomainStatus::Error => DomainIndexingState::Error,
    }
}

/// Per-domain document state shared by both conversion modes.
struct DocumentPipeline<'p> {
    processor: &'p dyn DocumentProcessor,
    domain: EdgeDomain,
    decorator: DocumentDecorator,
    seen_urls: HashSet<String>,
    disqualifier: DocumentDisqualifier,
    deduplicator: DocumentDeduplicator,
}

impl<'p> DocumentPipeline<'p> {
    fn new(
        owner: &'p DomainProcessor,
        domain: &EdgeDomain,
        decorator: DocumentDecorator,
    ) -> Result<Self, ConvertError> {
        let cfg = &owner.config;
        Ok(Self {
            processor: owner.processor.as_ref(),
            domain: domain.clone(),
            decorator,
            seen_urls: HashSet::new(),
            disqualifier: DocumentDisqualifier::new(
                cfg.domain.min_avg_document_quality,
                cfg.domain.short_circuit,
            ),
            deduplicator: DocumentDeduplicator::new(&cfg.dedup)?,
        })
    }

    /// `None` when the document is skipped: no URL, already seen, or the
    /// processor failed on it.
    fn convert(&mut self, doc: &CrawledDocument) -> Option<ProcessedDocument> {
        let Some(raw_url) = doc.url.as_deref().filter(|u| !u.is_empty()) else {
            debug!("document_without_url");
            return None;
        };
        if !self.seen_urls.insert(raw_url.to_string()) {
            debug!(url = raw_url, "document_already_seen");
            return None;
        }

        let result = if self.disqualifier.is_qualified() {
            self.processor
                .process(doc, &DocumentContext::new(&self.domain))
        } else {
            self.processor
                .disqualified_stub(doc, DisqualificationReason::ShortCircuit)
        };

        let mut processed = match result {
            Ok(processed) => processed,
            Err(err) => {
                warn!(error = %err, url = raw_url, "document_processing_failure");
                return None;
            }
        };
        if processed.url.is_none() {
            return None;
        }

        match (processed.state, processed.state_reason) {
            (UrlIndexingState::Ok, _) => {
                if let Some(quality) = processed.quality() {
                    self.disqualifier.offer(quality);
                }
            }
            (_, Some(DisqualificationReason::Language)) => self.disqualifier.offer(LANGUAGE_PENALTY),
            _ => {}
        }

        self.decorator.apply(&mut processed);
        self.deduplicator.mark_if_duplicate(&mut processed);
        Some(processed)
    }

    fn finish(mut self) -> (DocumentDecorator, DedupStats, DocumentDisqualifier) {
        let stats = self.deduplicator.close();
        (self.decorator, stats, self.disqualifier)
    }
}

/// Lazy conversion of an oversized domain.
///
/// Yields converted documents in stream order. Canonical repair and site
/// words need the whole domain and are skipped on this path; each fully
/// processed document instead gets an approximate size and topology.
/// [`into_processed_domain`](Self::into_processed_domain) converts the rest
/// of the stream and runs the full statistics step.
pub struct SideloadProcessing<'p, S: CrawlDataStream> {
    owner: &'p DomainProcessor,
    stream: S,
    domain: ProcessedDomain,
    pipeline: DocumentPipeline<'p>,
    closed: bool,
}

impl<'p, S: CrawlDataStream> SideloadProcessing<'p, S> {
    /// The domain record, without documents.
    pub fn domain(&self) -> &ProcessedDomain {
        &self.domain
    }

    /// Release the stream and the deduplicator. The iterator is exhausted
    /// afterwards.
    pub fn close(&mut self) -> DedupStats {
        if !self.closed {
            self.closed = true;
            self.stream.close();
        }
        self.pipeline.deduplicator.close()
    }

    /// Convert the documents not yet pulled and return the complete domain.
    pub fn into_processed_domain(mut self) -> ProcessedDomain {
        let started = Instant::now();
        let documents: Vec<ProcessedDocument> = self.by_ref().collect();
        let dedup_stats = self.close();

        let mut domain = self.domain;
        domain.documents = documents;
        let stats = self
            .owner
            .calculate_statistics(&mut domain, self.pipeline.decorator.links());

        info!(
            domain = %domain.domain,
            documents = domain.size(),
            duplicates = dedup_stats.duplicates,
            site_words = stats.site_words,
            adjacent_documents = stats.adjacent_documents,
            elapsed_micros = started.elapsed().as_micros() as u64,
            "domain_sideload_materialized"
        );
        domain
    }
}

impl<S: CrawlDataStream> Iterator for SideloadProcessing<'_, S> {
    type Item = ProcessedDocument;

    fn next(&mut self) -> Option<ProcessedDocument> {
        while !self.closed {
            let doc = match self.stream.next()? {
                Ok(CrawlData::Document(doc)) => doc,
                Ok(CrawlData::Domain(_)) => continue,
                Err(err @ StreamError::Parse { .. }) => {
                    warn!(domain = %self.domain.domain, error = %err, "crawl_record_skipped");
                    continue;
                }
                Err(err) => {
                    warn!(domain = %self.domain.domain, error = %err, "domain_sideload_failure");
                    self.closed = true;
                    return None;
                }
            };

            let Some(mut processed) = self.pipeline.convert(&doc) else {
                continue;
            };
            if processed.is_processed_fully() {
                let external = processed
                    .url
                    .as_ref()
                    .map_or(0, |url| self.pipeline.decorator.links().count_for_url(url));
                if let Some(details) = processed.details.as_mut() {
                    details.metadata = details
                        .metadata
                        .with_size_and_topology(SIDELOAD_DOMAIN_SIZE, external);
                }
            }
            return Some(processed);
        }
        None
    }
}
