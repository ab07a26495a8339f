mod common;

use std::sync::Arc;

use common::{article, document, domain_header, processor, processor_with};
use converter::{
    ConvertError, ConverterConfig, DomainLinks, InMemoryCrawlDataStream, StaticAnchorTags,
    StaticGeoIp,
};
use metadata::{IndexBlock, WordFlag, WordMetadata};
use model::{
    CrawlData, CrawledDocument, CrawlerDomainStatus, DisqualificationReason, DomainIndexingState,
    EdgeDomain, ProcessedDocument, ProcessedDomain,
};

fn find<'a>(domain: &'a ProcessedDomain, path: &str) -> &'a ProcessedDocument {
    domain
        .documents
        .iter()
        .find(|d| d.url.as_ref().is_some_and(|u| u.path == path))
        .unwrap_or_else(|| panic!("no document at {path}"))
}

fn flagged(doc: &ProcessedDocument, block: IndexBlock, word: &str, flag: WordFlag) -> bool {
    doc.words
        .as_ref()
        .and_then(|w| w.metadata(block, word))
        .is_some_and(|m| WordMetadata::has_flag(m, flag))
}

#[test]
fn blanket_canonical_on_crawled_page() -> Result<(), ConvertError> {
    let a = CrawledDocument::html("https://a.com/a", article("A", "Alpha", 1, &[]))
        .with_canonical("https://a.com/b")
        .with_body_hash("hash-a");
    let b = CrawledDocument::html("https://a.com/b", article("B", "Beta", 2, &[]))
        .with_canonical("https://a.com/b")
        .with_body_hash("hash-b");
    let c = CrawledDocument::html("https://a.com/c", article("C", "Gamma", 3, &[]))
        .with_canonical("https://a.com/b")
        .with_body_hash("hash-c");

    let stream = InMemoryCrawlDataStream::new([
        domain_header("a.com", CrawlerDomainStatus::Ok),
        CrawlData::Document(a),
        CrawlData::Document(b),
        CrawlData::Document(c),
    ]);
    let domain = processor().full_processing(stream)?;

    assert_eq!(domain.documents.len(), 3);
    // b is a crawled url, so neither claimant can take it over
    assert_eq!(find(&domain, "/a").state_reason, Some(DisqualificationReason::Status));
    assert_eq!(find(&domain, "/c").state_reason, Some(DisqualificationReason::Status));
    assert!(find(&domain, "/b").is_processed_fully());
    Ok(())
}

#[test]
fn single_document_domain_states() -> Result<(), ConvertError> {
    for (status, state) in [
        (CrawlerDomainStatus::Ok, DomainIndexingState::Active),
        (CrawlerDomainStatus::Blocked, DomainIndexingState::Blocked),
    ] {
        let stream = InMemoryCrawlDataStream::new([
            domain_header("www.a.com", status),
            document("https://www.a.com/", article("Home", "Welcome", 0, &[])),
        ]);
        let domain = processor().full_processing(stream)?;
        assert_eq!(domain.state, state);
        assert_eq!(domain.domain, EdgeDomain::new("www.a.com"));
        assert_eq!(domain.documents.len(), 1);
    }
    Ok(())
}

#[test]
fn missing_header_aborts_domain() {
    let stream = InMemoryCrawlDataStream::new([document(
        "https://a.com/",
        article("Home", "Welcome", 0, &[]),
    )]);
    let err = processor().full_processing(stream).unwrap_err();
    assert!(matches!(err, ConvertError::MissingDomainHeader));
}

#[test]
fn title_words_shared_by_most_pages_become_site_words() -> Result<(), ConvertError> {
    let mut records = vec![domain_header("a.com", CrawlerDomainStatus::Ok)];
    for i in 0..30 {
        records.push(document(
            &format!("https://a.com/p{i}"),
            article(&format!("Allotment Diary {i}"), &format!("Entry {i}"), i, &[]),
        ));
    }
    let domain = processor().full_processing(InMemoryCrawlDataStream::new(records))?;

    let allotment = text::stem("allotment");
    let accepted: Vec<_> = domain.fully_processed().collect();
    assert_eq!(accepted.len(), 30);
    for doc in accepted {
        assert!(flagged(doc, IndexBlock::Title, &allotment, WordFlag::Site));
        // headings count through the subjects block
        assert!(flagged(doc, IndexBlock::Subjects, &text::stem("entry"), WordFlag::Site));
    }
    Ok(())
}

#[test]
fn heading_shared_by_linking_pages_becomes_adjacent() -> Result<(), ConvertError> {
    let mut records = vec![
        domain_header("a.com", CrawlerDomainStatus::Ok),
        // the target mentions marrows in its title, so they are a candidate
        document("https://a.com/target", article("Marrows", "Harvest", 0, &[])),
    ];
    for i in 1..=4 {
        records.push(document(
            &format!("https://a.com/src{i}"),
            article("Notes", "Marrows", i, &["/target"]),
        ));
    }
    let domain = processor().full_processing(InMemoryCrawlDataStream::new(records))?;

    let marrow = text::stem("marrows");
    let target = find(&domain, "/target");
    assert!(flagged(target, IndexBlock::Title, &marrow, WordFlag::SiteAdjacent));
    assert_eq!(target.details.as_ref().map(|d| d.metadata.topology), Some(4));

    let source = find(&domain, "/src1");
    assert!(!flagged(source, IndexBlock::Subjects, &marrow, WordFlag::SiteAdjacent));
    Ok(())
}

#[test]
fn three_linking_pages_are_not_enough() -> Result<(), ConvertError> {
    let mut records = vec![
        domain_header("a.com", CrawlerDomainStatus::Ok),
        document("https://a.com/target", article("Marrows", "Harvest", 0, &[])),
    ];
    for i in 1..=3 {
        records.push(document(
            &format!("https://a.com/src{i}"),
            article("Notes", "Marrows", i, &["/target"]),
        ));
    }
    let domain = processor().full_processing(InMemoryCrawlDataStream::new(records))?;

    let target = find(&domain, "/target");
    assert!(!flagged(target, IndexBlock::Title, &text::stem("marrows"), WordFlag::SiteAdjacent));
    Ok(())
}

#[test]
fn decorator_terms_and_external_anchors() -> Result<(), ConvertError> {
    let mut header = model::CrawledDomain::new("www.cs.uni.ac.uk", CrawlerDomainStatus::Ok);
    header.ip = Some("34.1.1.1".to_string());

    let geo = StaticGeoIp::new()
        .with_country("34.1.1.1", "GB")
        .with_asn("34.1.1.1", 396982, "GOOGLE-CLOUD-PLATFORM");
    let mut links = DomainLinks::new();
    links.add("/", "Department of Computing");
    links.add("/", "computing department");
    let mut tags = StaticAnchorTags::new();
    tags.insert(EdgeDomain::new("www.cs.uni.ac.uk"), links);

    let processor = processor()
        .with_geo_ip(Arc::new(geo))
        .with_anchor_tags(Arc::new(tags));

    let stream = InMemoryCrawlDataStream::new([
        CrawlData::Domain(header),
        document("https://www.cs.uni.ac.uk/", article("Home", "Welcome", 0, &[])),
    ]);
    let domain = processor.full_processing(stream)?;
    let doc = &domain.documents[0];
    let words = doc.words.as_ref().expect("keywords");

    for term in [
        "ip:34.1.1.1",
        "ip:gb",
        "as:396982",
        "as:google",
        "as:cloud",
        "as:platform",
        "special:cloud",
        "special:academia",
    ] {
        assert!(words.contains(IndexBlock::Meta, term), "missing {term}");
    }
    assert!(words.contains(IndexBlock::Link, &text::stem("computing")));
    assert!(words.contains(IndexBlock::Link, &text::stem("department")));

    // two external anchors, no internal links
    assert_eq!(doc.details.as_ref().map(|d| d.metadata.topology), Some(2));
    Ok(())
}

#[test]
fn near_duplicate_pages_are_marked_not_dropped() -> Result<(), ConvertError> {
    let original = article("Beans", "Climbing beans", 3, &[]);
    let copy = original.replace("page number 3", "page number three");

    let stream = InMemoryCrawlDataStream::new([
        domain_header("a.com", CrawlerDomainStatus::Ok),
        document("https://a.com/beans", original),
        document("https://a.com/beans-copy", copy),
        document("https://a.com/other", article("Other", "Different", 5, &[])),
    ]);
    let domain = processor().full_processing(stream)?;

    let copy = find(&domain, "/beans-copy");
    assert_eq!(
        copy.duplicate_of.as_ref().map(|u| u.path.as_str()),
        Some("/beans")
    );
    assert!(copy.is_processed_fully());
    assert!(find(&domain, "/beans").duplicate_of.is_none());
    Ok(())
}

#[test]
fn short_circuit_disqualifies_rest_of_poor_domain() -> Result<(), ConvertError> {
    let mut config = ConverterConfig::default();
    config.domain.short_circuit = true;
    config.domain.min_avg_document_quality = 100.0;

    let mut records = vec![domain_header("a.com", CrawlerDomainStatus::Ok)];
    for i in 0..27 {
        records.push(document(
            &format!("https://a.com/{i}"),
            article("Page", "Heading", i, &[]),
        ));
    }
    let domain = processor_with(config).full_processing(InMemoryCrawlDataStream::new(records))?;

    assert_eq!(domain.documents.len(), 27);
    assert_eq!(domain.fully_processed().count(), 25);
    assert_eq!(
        domain.documents[26].state_reason,
        Some(DisqualificationReason::ShortCircuit)
    );
    Ok(())
}
