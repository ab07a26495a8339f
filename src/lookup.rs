//! Read-only lookups consulted while decorating documents.
//!
//! Both traits are infallible by contract: a miss or a broken backend yields
//! an empty answer and the document is converted without the extra terms.

use std::collections::HashMap;

use model::{EdgeDomain, EdgeUrl};

/// Autonomous system of an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsnInfo {
    pub asn: u32,
    /// Registered organisation, e.g. `AMAZON-02` or `GOOGLE-CLOUD-PLATFORM`.
    pub org: String,
}

pub trait GeoIpLookup: Send + Sync {
    /// ISO country code of `ip`.
    fn country(&self, ip: &str) -> Option<String>;
    fn asn_info(&self, ip: &str) -> Option<AsnInfo>;
}

/// Lookup that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGeoIp;

impl GeoIpLookup for NullGeoIp {
    fn country(&self, _ip: &str) -> Option<String> {
        None
    }

    fn asn_info(&self, _ip: &str) -> Option<AsnInfo> {
        None
    }
}

/// Fixed in-memory table.
#[derive(Debug, Clone, Default)]
pub struct StaticGeoIp {
    countries: HashMap<String, String>,
    asns: HashMap<String, AsnInfo>,
}

impl StaticGeoIp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_country(mut self, ip: impl Into<String>, country: impl Into<String>) -> Self {
        self.countries.insert(ip.into(), country.into());
        self
    }

    pub fn with_asn(mut self, ip: impl Into<String>, asn: u32, org: impl Into<String>) -> Self {
        self.asns.insert(
            ip.into(),
            AsnInfo {
                asn,
                org: org.into(),
            },
        );
        self
    }
}

impl GeoIpLookup for StaticGeoIp {
    fn country(&self, ip: &str) -> Option<String> {
        self.countries.get(ip).cloned()
    }

    fn asn_info(&self, ip: &str) -> Option<AsnInfo> {
        self.asns.get(ip).cloned()
    }
}

/// Anchor texts of links pointing into one domain from elsewhere, keyed by
/// target path (including the query, when there is one).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainLinks {
    anchors: HashMap<String, Vec<String>>,
}

impl DomainLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: impl Into<String>, anchor_text: impl Into<String>) {
        self.anchors
            .entry(path.into())
            .or_default()
            .push(anchor_text.into());
    }

    /// Number of external links to `url`.
    pub fn count_for_url(&self, url: &EdgeUrl) -> usize {
        self.anchor_texts(url).len()
    }

    pub fn anchor_texts(&self, url: &EdgeUrl) -> &[String] {
        self.anchors
            .get(&path_key(url))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

fn path_key(url: &EdgeUrl) -> String {
    match &url.param {
        Some(param) => format!("{}?{}", url.path, param),
        None => url.path.clone(),
    }
}

pub trait AnchorTagsSource: Send + Sync {
    fn anchor_tags(&self, domain: &EdgeDomain) -> DomainLinks;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnchorTags;

impl AnchorTagsSource for NullAnchorTags {
    fn anchor_tags(&self, _domain: &EdgeDomain) -> DomainLinks {
        DomainLinks::default()
    }
}

/// Anchor tags held in memory, keyed by full domain name.
#[derive(Debug, Clone, Default)]
pub struct StaticAnchorTags {
    domains: HashMap<EdgeDomain, DomainLinks>,
}

impl StaticAnchorTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, domain: EdgeDomain, links: DomainLinks) {
        self.domains.insert(domain, links);
    }
}

impl AnchorTagsSource for StaticAnchorTags {
    fn anchor_tags(&self, domain: &EdgeDomain) -> DomainLinks {
        self.domains.get(domain).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_links_match_path_and_query() {
        let mut links = DomainLinks::new();
        links.add("/docs", "Rust documentation");
        links.add("/docs", "the docs");
        links.add("/search?q=x", "search");

        let docs = EdgeUrl::parse("https://a.com/docs").unwrap();
        assert_eq!(links.count_for_url(&docs), 2);
        assert_eq!(links.anchor_texts(&docs)[1], "the docs");

        let search = EdgeUrl::parse("https://a.com/search?q=x").unwrap();
        assert_eq!(links.count_for_url(&search), 1);

        let other = EdgeUrl::parse("https://a.com/other").unwrap();
        assert_eq!(links.count_for_url(&other), 0);
        assert!(links.anchor_texts(&other).is_empty());
    }

    #[test]
    fn static_sources_miss_to_empty() {
        let mut tags = StaticAnchorTags::new();
        let mut links = DomainLinks::new();
        links.add("/", "home");
        tags.insert(EdgeDomain::new("a.com"), links);

        assert!(!tags.anchor_tags(&EdgeDomain::new("a.com")).is_empty());
        assert!(tags.anchor_tags(&EdgeDomain::new("b.com")).is_empty());
        assert!(NullAnchorTags.anchor_tags(&EdgeDomain::new("a.com")).is_empty());

        let geo = StaticGeoIp::new().with_country("1.2.3.4", "SE");
        assert_eq!(geo.country("1.2.3.4").as_deref(), Some("SE"));
        assert_eq!(geo.asn_info("1.2.3.4"), None);
        assert_eq!(NullGeoIp.country("1.2.3.4"), None);
    }
}
