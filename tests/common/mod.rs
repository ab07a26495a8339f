#![allow(dead_code)]

use std::sync::Arc;

use converter::{ConverterConfig, DomainProcessor, HtmlDocumentProcessor, TermFrequencyDict};
use model::{CrawlData, CrawledDocument, CrawledDomain, CrawlerDomainStatus};

const SENTENCES: [&str; 8] = [
    "The garden is where we grow our vegetables every summer.",
    "It is a quiet place and we go there early in the morning.",
    "There are tomatoes, beans and squash growing in the raised beds.",
    "Our neighbour Alice helps with the compost, and Alice knows the soil well.",
    "In the evening the garden is cool and we sit there with tea.",
    "The birds come to the hedge when the light begins to fade.",
    "We keep notes about what grew well and what did not.",
    "Next year we will try a few more varieties of climbing beans.",
];

/// HTML processor and domain processor with default settings.
pub fn processor() -> DomainProcessor {
    processor_with(ConverterConfig::default())
}

pub fn processor_with(config: ConverterConfig) -> DomainProcessor {
    let html = HtmlDocumentProcessor::new(
        config.document.clone(),
        config.dedup.clone(),
        Arc::new(TermFrequencyDict::default()),
    );
    DomainProcessor::new(config, Arc::new(html))
}

/// An English page of about eighty words. `seed` rotates the sentence order
/// so that pages with different seeds are not near-duplicates.
pub fn article(title: &str, heading: &str, seed: usize, links: &[&str]) -> String {
    let mut body = String::new();
    for i in 0..SENTENCES.len() {
        body.push_str(SENTENCES[(i * (seed % 7 + 1) + seed) % SENTENCES.len()]);
        body.push(' ');
    }
    body.push_str(&format!("This is page number {seed}. "));

    let anchors: String = links
        .iter()
        .map(|href| format!("<a href=\"{href}\">more</a> "))
        .collect();

    format!(
        "<html><head><title>{title}</title></head>\
         <body><h1>{heading}</h1><p>{body}</p><nav>{anchors}</nav></body></html>"
    )
}

pub fn domain_header(name: &str, status: CrawlerDomainStatus) -> CrawlData {
    CrawlData::Domain(CrawledDomain::new(name, status))
}

pub fn document(url: &str, body: String) -> CrawlData {
    CrawlData::Document(CrawledDocument::html(url, body))
}
