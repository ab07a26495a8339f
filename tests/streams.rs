mod common;

use std::io::Write;

use common::{article, document, domain_header, processor, processor_with};
use converter::{
    ConvertError, ConvertedDomain, ConverterConfig, JsonlCrawlDataStream, SIDELOAD_DOMAIN_SIZE,
    convert_files,
};
use metadata::encode_domain_size;
use model::{CrawlData, CrawlerDomainStatus, DisqualificationReason, DomainIndexingState};
use tempfile::NamedTempFile;

fn jsonl(records: &[CrawlData]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    for record in records {
        let line = serde_json::to_string(record).expect("serialize record");
        writeln!(file, "{line}").expect("write record");
    }
    file.flush().expect("flush");
    file
}

fn linked_site() -> Vec<CrawlData> {
    vec![
        domain_header("a.com", CrawlerDomainStatus::Ok),
        document("https://a.com/", article("Home", "Welcome", 0, &["/a", "/b"])),
        document("https://a.com/a", article("A", "Alpha", 1, &["/b"])),
        document("https://a.com/b", article("B", "Beta", 2, &[])),
    ]
}

#[test]
fn converts_jsonl_files() {
    let good = jsonl(&linked_site());
    let headless = jsonl(&[document("https://b.com/", article("B", "Beta", 2, &[]))]);

    let results = convert_files(&processor(), &[good.path(), headless.path()]);
    assert_eq!(results.len(), 2);

    let domain = results[0].1.as_ref().expect("first file converts");
    assert_eq!(domain.state, DomainIndexingState::Active);
    assert_eq!(domain.documents.len(), 3);
    assert!(matches!(results[1].1, Err(ConvertError::MissingDomainHeader)));
}

#[test]
fn malformed_lines_are_skipped() -> Result<(), ConvertError> {
    let mut file = jsonl(&linked_site());
    writeln!(file, "{{not json").expect("write");
    writeln!(file).expect("write");
    let extra = serde_json::to_string(&document(
        "https://a.com/c",
        article("C", "Gamma", 3, &[]),
    ))
    .expect("serialize record");
    writeln!(file, "{extra}").expect("write");
    file.flush().expect("flush");

    let stream = JsonlCrawlDataStream::open(file.path())?;
    let domain = processor().full_processing(stream)?;
    assert_eq!(domain.documents.len(), 4);
    Ok(())
}

#[test]
fn unknown_document_status_becomes_status_stub() -> Result<(), ConvertError> {
    let mut file = jsonl(&linked_site());
    writeln!(
        file,
        r#"{{"type":"document","url":"https://a.com/gone","crawler_status":"HTTP_ERROR","http_status":503}}"#
    )
    .expect("write");
    file.flush().expect("flush");

    let domain = processor().full_processing(JsonlCrawlDataStream::open(file.path())?)?;
    assert_eq!(domain.documents.len(), 4);
    let gone = domain
        .documents
        .iter()
        .find(|d| d.url.as_ref().is_some_and(|u| u.path == "/gone"))
        .expect("document with unknown status is kept");
    assert_eq!(gone.state_reason, Some(DisqualificationReason::Status));
    Ok(())
}

#[test]
fn large_stream_goes_through_sideload() -> Result<(), ConvertError> {
    let mut config = ConverterConfig::default();
    config.domain.sideload_threshold_bytes = 1;
    let processor = processor_with(config);

    let file = jsonl(&linked_site());
    let converted = processor.create_writable(JsonlCrawlDataStream::open(file.path())?)?;
    let ConvertedDomain::Sideload(mut sideload) = converted else {
        panic!("expected sideload mode");
    };
    assert!(sideload.domain().documents.is_empty());

    // pulled documents carry the approximate topology
    let first = sideload.next().expect("first document");
    let metadata = first.details.as_ref().map(|d| d.metadata);
    assert_eq!(
        metadata.map(|m| m.enc_size),
        Some(encode_domain_size(SIDELOAD_DOMAIN_SIZE))
    );
    assert_eq!(metadata.map(|m| m.topology), Some(0));

    // the rest are materialized with statistics over what is left, so only
    // the link from /a counts towards /b
    let domain = sideload.into_processed_domain();
    assert_eq!(domain.documents.len(), 2);
    let b = domain
        .documents
        .iter()
        .find(|d| d.url.as_ref().is_some_and(|u| u.path == "/b"))
        .expect("document b");
    assert_eq!(b.details.as_ref().map(|d| d.metadata.topology), Some(1));
    Ok(())
}

#[test]
fn small_stream_is_converted_in_full() -> Result<(), ConvertError> {
    let file = jsonl(&linked_site());
    let processor = processor();
    let converted = processor.create_writable(JsonlCrawlDataStream::open(file.path())?)?;
    assert!(!converted.is_sideload());
    assert_eq!(converted.into_processed_domain().documents.len(), 3);
    Ok(())
}
