use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use dedup::{DedupConfig, DedupError};
use metadata::{
    DocumentKeywords, DocumentMetadata, IndexBlock, KeywordMetadata, TF_IDF_HIGH_LIMIT,
    TF_IDF_MEDIUM_LIMIT, WordFlag,
};
use model::{
    CrawledDocument, CrawlerDocumentStatus, DisqualificationReason, EdgeUrl, ProcessedDocument,
    ProcessedDocumentDetails,
};
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use super::{DocumentContext, DocumentProcessor, TermFrequencyDict, parse_document_url};
use crate::config::DocumentConfig;
use crate::error::ProcessingError;

/// Multiplier from `tf * idf` to the integer tf-idf stored in word metadata.
const TF_IDF_SCALE: f64 = 40.0;
/// Capitalized mid-sentence occurrences that make a word name-like.
const MIN_NAME_OCCURRENCES: usize = 2;
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Reference [`DocumentProcessor`] for HTML pages.
#[derive(Debug, Clone)]
pub struct HtmlDocumentProcessor {
    config: DocumentConfig,
    dedup: DedupConfig,
    dict: Arc<TermFrequencyDict>,
}

impl HtmlDocumentProcessor {
    pub fn new(config: DocumentConfig, dedup: DedupConfig, dict: Arc<TermFrequencyDict>) -> Self {
        Self {
            config,
            dedup,
            dict,
        }
    }

    fn check_document(
        &self,
        doc: &CrawledDocument,
        url: &EdgeUrl,
    ) -> Option<DisqualificationReason> {
        if doc.crawler_status != CrawlerDocumentStatus::Ok {
            return Some(DisqualificationReason::Status);
        }

        let html_content = doc
            .content_type
            .as_deref()
            .is_none_or(|ct| {
                let ct = ct.to_ascii_lowercase();
                ct.starts_with("text/html") || ct.starts_with("application/xhtml")
            });
        if !html_content || doc.document_body.as_deref().is_none_or(str::is_empty) {
            return Some(DisqualificationReason::Content);
        }

        let points_elsewhere = doc
            .foreign_canonical()
            .and_then(|c| EdgeUrl::parse(c).ok())
            .is_some_and(|c| c.domain == url.domain && c != *url);
        if points_elsewhere {
            return Some(DisqualificationReason::Canonical);
        }

        None
    }
}

impl DocumentProcessor for HtmlDocumentProcessor {
    fn process(
        &self,
        doc: &CrawledDocument,
        ctx: &DocumentContext<'_>,
    ) -> Result<ProcessedDocument, ProcessingError> {
        let url = parse_document_url(doc)?;

        if let Some(reason) = self.check_document(doc, &url) {
            debug!(url = %url, reason = %reason, "document_disqualified");
            return Ok(ProcessedDocument::disqualified_stub(Some(url), reason));
        }

        let body = doc.document_body.as_deref().unwrap_or_default();
        let page = ParsedPage::parse(body, &url)?;

        let sentences = text::split_sentences(&page.text);
        let length: usize = sentences.iter().map(|s| s.len()).sum();

        let reject = |reason: DisqualificationReason| {
            debug!(url = %url, reason = %reason, length, "document_disqualified");
            Ok(ProcessedDocument::disqualified_stub(Some(url.clone()), reason))
        };

        if length < self.config.min_document_words {
            return reject(DisqualificationReason::Length);
        }

        let tokens: Vec<&str> = sentences
            .iter()
            .flat_map(|s| s.words.iter().map(|w| w.text.as_str()))
            .collect();

        if self.config.language_filter
            && text::english_agreement(&tokens) < self.config.min_english_agreement
        {
            return reject(DisqualificationReason::Language);
        }

        let quality = page.quality(body.len());
        if quality < self.config.min_document_quality {
            return reject(DisqualificationReason::Quality);
        }

        let signature = match dedup::signature(&tokens, &self.dedup) {
            Ok(signature) => signature,
            Err(DedupError::NotEnoughTokens { .. }) => Vec::new(),
            Err(err) => return Err(err.into()),
        };

        let words = KeywordExtractor::new(&self.dict).extract(&sentences, &page, &url, ctx);

        let avg_sentence_length = length as f64 / sentences.len().max(1) as f64;
        let flags = if page.scripts > 0 {
            DocumentMetadata::FLAG_JAVASCRIPT
        } else {
            0
        };

        let (links_internal, links_external) = page.split_links(&url);
        let details = ProcessedDocumentDetails {
            title: page.title,
            description: page.description,
            length,
            quality,
            links_internal,
            links_external,
            metadata: DocumentMetadata::new(quality, avg_sentence_length, flags),
            signature,
        };

        Ok(ProcessedDocument::accepted(url, details, words))
    }
}

/// The parts of an HTML page the processor works from.
#[derive(Debug, Default)]
struct ParsedPage {
    title: String,
    description: String,
    headings: Vec<String>,
    text: String,
    links: Vec<EdgeUrl>,
    scripts: usize,
}

impl ParsedPage {
    fn parse(body: &str, url: &EdgeUrl) -> Result<Self, ProcessingError> {
        let html = Html::parse_document(body);
        let sel = |css: &str| {
            Selector::parse(css).map_err(|err| ProcessingError::Html {
                url: url.to_string(),
                reason: format!("selector {css:?}: {err}"),
            })
        };

        let title = html
            .select(&sel("title")?)
            .next()
            .map(|el| text::collapse_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default();

        let description = html
            .select(&sel("meta[name='description']")?)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(text::collapse_whitespace)
            .unwrap_or_default();

        let headings = html
            .select(&sel("h1, h2, h3")?)
            .map(|el| text::collapse_whitespace(&el.text().collect::<String>()))
            .filter(|h| !h.is_empty())
            .collect();

        let mut links = Vec::new();
        for anchor in html.select(&sel("a[href]")?) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let href = href.trim();
            if href.is_empty() || href.starts_with('#') {
                continue;
            }
            // mailto:, javascript: and friends fail the scheme check
            if let Ok(link) = url.join(href) {
                links.push(link);
            }
        }

        let scripts = html.select(&sel("script")?).count();

        let text = match html.select(&sel("body")?).next() {
            Some(body) => visible_text(body),
            None => visible_text(html.root_element()),
        };

        Ok(Self {
            title,
            description,
            headings,
            text,
            links,
            scripts,
        })
    }

    /// Text-to-markup ratio on a log scale, minus a penalty per script tag.
    fn quality(&self, html_len: usize) -> f64 {
        let ratio = self.text.trim().len() as f64 / html_len.max(1) as f64;
        5.0 * ratio.max(1e-3).ln() - 0.5 * self.scripts as f64
    }

    /// Deduplicated links in document order, split by whether they stay on
    /// the page's own domain.
    fn split_links(&self, url: &EdgeUrl) -> (Vec<EdgeUrl>, Vec<EdgeUrl>) {
        let mut seen = HashSet::new();
        self.links
            .iter()
            .filter(|link| seen.insert(*link))
            .cloned()
            .partition(|link| link.domain == url.domain)
    }
}

fn visible_text(root: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in root.descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| HIDDEN_ELEMENTS.contains(&el.value().name()));
        if !hidden {
            out.push_str(fragment);
            out.push(' ');
        }
    }
    text::collapse_whitespace(&out)
}

/// Turns a page's sentences into per-block keyword metadata.
struct KeywordExtractor<'a> {
    dict: &'a TermFrequencyDict,
    meta: KeywordMetadata,
}

impl<'a> KeywordExtractor<'a> {
    fn new(dict: &'a TermFrequencyDict) -> Self {
        Self {
            dict,
            meta: KeywordMetadata::new(),
        }
    }

    fn extract(
        mut self,
        sentences: &[text::Sentence],
        page: &ParsedPage,
        url: &EdgeUrl,
        ctx: &DocumentContext<'_>,
    ) -> DocumentKeywords {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut capitalized: HashMap<String, usize> = HashMap::new();

        for sentence in sentences {
            for word in &sentence.words {
                let Some(stem) = keyword_stem(&word.text) else {
                    continue;
                };
                self.meta.add_position(&stem, sentence.index);
                if word.capitalized && word.index_in_sentence > 0 {
                    *capitalized.entry(stem.clone()).or_default() += 1;
                }
                *counts.entry(stem).or_default() += 1;
            }
        }

        let max_count = counts.values().copied().max().unwrap_or(1) as f64;
        for (stem, count) in &counts {
            let tf = 0.5 + 0.5 * *count as f64 / max_count;
            let tf_idf = (tf * self.dict.idf(stem) * TF_IDF_SCALE).round() as i32;
            self.meta.set_tf_idf(stem, tf_idf);
        }

        let title = stems_of(&page.title);
        let subjects: HashSet<String> = page.headings.iter().flat_map(|h| stems_of(h)).collect();
        let names: HashSet<String> = capitalized
            .into_iter()
            .filter(|&(_, n)| n >= MIN_NAME_OCCURRENCES)
            .map(|(stem, _)| stem)
            .collect();
        let path_words: HashSet<String> = url
            .path_words()
            .filter_map(|w| keyword_stem(&w))
            .collect();
        let domain_words = domain_words(ctx);

        self.meta.mark_all(WordFlag::Title, title.iter().map(String::as_str));
        self.meta.mark_all(WordFlag::Subjects, subjects.iter().map(String::as_str));
        self.meta.mark_all(WordFlag::NamesWords, names.iter().map(String::as_str));
        self.meta.mark_all(WordFlag::UrlPath, path_words.iter().map(String::as_str));
        self.meta.mark_all(WordFlag::UrlDomain, domain_words.iter().map(String::as_str));

        let mut words = DocumentKeywords::new();
        let mut add = |block: IndexBlock, stem: &str| {
            words.add(block, stem, self.meta.metadata_for_word(stem));
        };

        for stem in &title {
            add(IndexBlock::Title, stem);
        }
        for stem in &subjects {
            add(IndexBlock::Subjects, stem);
        }
        for stem in &names {
            add(IndexBlock::NamesWords, stem);
        }
        for stem in counts.keys() {
            let tier = match self.meta.tf_idf(stem) {
                v if v > TF_IDF_HIGH_LIMIT => IndexBlock::TfIdfHigh,
                v if v > TF_IDF_MEDIUM_LIMIT => IndexBlock::TfIdfMedium,
                _ => IndexBlock::TfIdfLow,
            };
            add(tier, stem);
            add(IndexBlock::Words, stem);
        }

        words.add_terms(IndexBlock::Meta, meta_terms(url, page));
        words.add_terms(IndexBlock::Artifacts, email_addresses(&page.text));
        words
    }
}

/// Stem of a lowercased word, or `None` for stop words and tokens without
/// letters.
fn keyword_stem(word: &str) -> Option<String> {
    if word.len() < 2 || text::is_stop_word(word) || !word.chars().any(char::is_alphabetic) {
        return None;
    }
    Some(text::stem(word))
}

fn stems_of(s: &str) -> HashSet<String> {
    text::word_tokens(s)
        .iter()
        .filter_map(|w| keyword_stem(w))
        .collect()
}

/// Subdomain labels and the registrable label of the domain, minus `www`.
fn domain_words(ctx: &DocumentContext<'_>) -> HashSet<String> {
    let domain = ctx.domain;
    let registrable = domain.top_domain.split('.').next().unwrap_or_default();

    domain
        .subdomain
        .split('.')
        .chain(std::iter::once(registrable))
        .filter(|label| !label.is_empty() && *label != "www")
        .filter_map(keyword_stem)
        .collect()
}

fn meta_terms(url: &EdgeUrl, page: &ParsedPage) -> Vec<String> {
    let mut terms = vec![
        format!("site:{}", url.domain),
        format!("site:{}", url.domain.top_domain),
        format!("proto:{}", url.proto),
        "format:html".to_string(),
    ];
    if page.scripts > 0 {
        terms.push("js:true".to_string());
    }
    terms
}

fn email_addresses(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| {
            w.split_once('@').is_some_and(|(user, host)| {
                !user.is_empty() && host.contains('.') && !host.starts_with('.')
            })
        })
        .map(str::to_lowercase)
        .collect()
}
