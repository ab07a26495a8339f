//! Canonical URL repair.
//!
//! Sites sometimes point a blanket canonical link at one page (often the
//! root) from many unrelated pages. Taken at face value that would fold the
//! whole site into a single document. [`fix_bad_canonical_tags`] undoes such
//! claims before any document is processed.

use std::collections::{HashMap, HashSet};

use model::{CrawledDocument, CrawlerDocumentStatus, EdgeUrl};
use tracing::debug;

/// Rewrite conflicting or cross-domain canonical claims in place.
///
/// A canonical target claimed by documents with more than one distinct body
/// hash is not trusted. The first such claimant of a target that is not
/// itself a crawled URL keeps its own URL as canonical and reserves the
/// target; later claimants of a reserved or crawled target are marked
/// [`CrawlerDocumentStatus::BadCanonical`]. A final sweep resets every
/// remaining untrusted claim, and any claim pointing at another domain, to
/// the document's own URL.
pub fn fix_bad_canonical_tags(docs: &mut [CrawledDocument]) {
    let mut hashes_by_canonical: HashMap<String, HashSet<String>> = HashMap::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for doc in docs.iter() {
        if let Some(canonical) = doc.foreign_canonical() {
            hashes_by_canonical
                .entry(canonical.to_string())
                .or_default()
                .insert(body_hash(doc));
        }
        if let Some(url) = &doc.url {
            seen_urls.insert(url.clone());
        }
    }

    let is_untrusted = |canonical: &str| {
        hashes_by_canonical
            .get(canonical)
            .is_some_and(|hashes| hashes.len() > 1)
    };

    for doc in docs.iter_mut() {
        let Some(canonical) = doc.foreign_canonical().map(str::to_string) else {
            continue;
        };
        if !is_untrusted(&canonical) {
            continue;
        }

        if seen_urls.insert(canonical) {
            doc.reset_canonical();
        } else {
            debug!(url = ?doc.url, "canonical_conflict");
            doc.crawler_status = CrawlerDocumentStatus::BadCanonical;
        }
    }

    for doc in docs.iter_mut() {
        if doc.foreign_canonical().is_some_and(is_untrusted) {
            doc.reset_canonical();
        }
    }

    for doc in docs.iter_mut() {
        let Some(canonical) = doc.canonical_url.as_deref().filter(|c| !c.is_empty()) else {
            continue;
        };
        let (Ok(canonical), Some(Ok(own))) = (
            EdgeUrl::parse(canonical),
            doc.url.as_deref().map(EdgeUrl::parse),
        ) else {
            continue;
        };
        if canonical.domain != own.domain {
            doc.reset_canonical();
        }
    }
}

/// The crawler's body hash, or one derived from the body when the record
/// has none.
fn body_hash(doc: &CrawledDocument) -> String {
    match (&doc.document_body_hash, &doc.document_body) {
        (Some(hash), _) => hash.clone(),
        (None, Some(body)) => text::hash_body(body),
        (None, None) => String::new(),
    }
}
