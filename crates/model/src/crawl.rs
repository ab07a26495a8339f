//! Records produced by the crawler.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One record of a crawl data stream. The first record of a well-formed
/// stream is always a [`CrawlData::Domain`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CrawlData {
    Domain(CrawledDomain),
    Document(CrawledDocument),
}

/// Crawl outcome for a whole domain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrawledDomain {
    pub domain: String,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub redirect_domain: Option<String>,
    /// Raw status string as written by the crawler, see [`CrawlerDomainStatus`].
    pub crawler_status: String,
    #[serde(default)]
    pub crawler_status_desc: Option<String>,
}

impl CrawledDomain {
    pub fn new(domain: impl Into<String>, status: CrawlerDomainStatus) -> Self {
        Self {
            domain: domain.into(),
            ip: None,
            redirect_domain: None,
            crawler_status: status.to_string(),
            crawler_status_desc: None,
        }
    }

    pub fn status(&self) -> CrawlerDomainStatus {
        self.crawler_status
            .parse()
            .unwrap_or(CrawlerDomainStatus::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlerDomainStatus {
    Ok,
    Redirect,
    Blocked,
    Error,
}

impl CrawlerDomainStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            CrawlerDomainStatus::Ok => "OK",
            CrawlerDomainStatus::Redirect => "REDIRECT",
            CrawlerDomainStatus::Blocked => "BLOCKED",
            CrawlerDomainStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for CrawlerDomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrawlerDomainStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OK" => Ok(CrawlerDomainStatus::Ok),
            "REDIRECT" => Ok(CrawlerDomainStatus::Redirect),
            "BLOCKED" => Ok(CrawlerDomainStatus::Blocked),
            "ERROR" => Ok(CrawlerDomainStatus::Error),
            other => Err(format!("unknown domain status {other:?}")),
        }
    }
}

/// Per-fetch crawler outcome of a document.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrawlerDocumentStatus {
    #[default]
    Ok,
    BadContentType,
    Redirect,
    Robots,
    Error,
    Timeout,
    /// Set during canonical fixing when a document's canonical claim conflicts
    /// with a URL already present in the crawl.
    BadCanonical,
    /// Any status this crate does not know. Treated like every other
    /// non-`OK` status.
    #[serde(other)]
    Other,
}

/// A single fetched document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CrawledDocument {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub document_body_hash: Option<String>,
    #[serde(default)]
    pub crawler_status: CrawlerDocumentStatus,
    #[serde(default)]
    pub http_status: u16,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub document_body: Option<String>,
}

impl CrawledDocument {
    /// An `OK`, `200`, `text/html` document.
    pub fn html(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            crawler_status: CrawlerDocumentStatus::Ok,
            http_status: 200,
            content_type: Some("text/html".to_string()),
            document_body: Some(body.into()),
            ..Self::default()
        }
    }

    pub fn with_canonical(mut self, canonical: impl Into<String>) -> Self {
        self.canonical_url = Some(canonical.into());
        self
    }

    pub fn with_body_hash(mut self, hash: impl Into<String>) -> Self {
        self.document_body_hash = Some(hash.into());
        self
    }

    /// A canonical claim that is present, non-empty and different from the
    /// document's own URL.
    pub fn foreign_canonical(&self) -> Option<&str> {
        let canonical = self.canonical_url.as_deref().filter(|c| !c.is_empty())?;
        match self.url.as_deref() {
            Some(url) if url == canonical => None,
            _ => Some(canonical),
        }
    }

    /// Point the canonical claim back at the document itself.
    pub fn reset_canonical(&mut self) {
        self.canonical_url = self.url.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_tagged() {
        let domain = CrawlData::Domain(CrawledDomain::new("example.com", CrawlerDomainStatus::Ok));
        let json = serde_json::to_string(&domain).unwrap();
        assert!(json.contains(r#""type":"domain""#));
        assert_eq!(serde_json::from_str::<CrawlData>(&json).unwrap(), domain);
    }

    #[test]
    fn minimal_document_uses_defaults() {
        let json = r#"{"type":"document","url":"https://example.com/","crawler_status":"BAD_CANONICAL"}"#;
        let CrawlData::Document(doc) = serde_json::from_str(json).unwrap() else {
            panic!("expected document");
        };
        assert_eq!(doc.crawler_status, CrawlerDocumentStatus::BadCanonical);
        assert_eq!(doc.http_status, 0);
        assert!(doc.document_body.is_none());
    }

    #[test]
    fn unknown_document_status_still_parses() {
        let json = r#"{"type":"document","url":"https://a.com/x","crawler_status":"HTTP_ERROR"}"#;
        let CrawlData::Document(doc) = serde_json::from_str(json).unwrap() else {
            panic!("expected document");
        };
        assert_eq!(doc.crawler_status, CrawlerDocumentStatus::Other);
        assert_eq!(doc.url.as_deref(), Some("https://a.com/x"));
    }

    #[test]
    fn unknown_domain_status_maps_to_error() {
        let mut domain = CrawledDomain::new("example.com", CrawlerDomainStatus::Ok);
        domain.crawler_status = "HTTP_ERROR".to_string();
        assert_eq!(domain.status(), CrawlerDomainStatus::Error);

        domain.crawler_status = "blocked".to_string();
        assert_eq!(domain.status(), CrawlerDomainStatus::Blocked);
    }

    #[test]
    fn foreign_canonical_ignores_self_and_empty() {
        let doc = CrawledDocument::html("https://a.com/x", "");
        assert_eq!(doc.foreign_canonical(), None);

        let doc = doc.with_canonical("");
        assert_eq!(doc.foreign_canonical(), None);

        let doc = doc.with_canonical("https://a.com/x");
        assert_eq!(doc.foreign_canonical(), None);

        let mut doc = doc.with_canonical("https://a.com/y");
        assert_eq!(doc.foreign_canonical(), Some("https://a.com/y"));

        doc.reset_canonical();
        assert_eq!(doc.canonical_url.as_deref(), Some("https://a.com/x"));
    }
}
