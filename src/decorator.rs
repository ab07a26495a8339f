//! Domain-derived terms added to every document of a domain.

use metadata::IndexBlock;
use model::{EdgeDomain, ProcessedDocument};

use crate::lookup::{AnchorTagsSource, DomainLinks, GeoIpLookup};

/// AS organisations whose address space is rented out as cloud hosting.
const CLOUD_ORGS: [&str; 6] = [
    "MICROSOFT-AZURE",
    "AMAZON",
    "CLOUDFLARE",
    "GOOGLE-CLOUD",
    "DIGITALOCEAN",
    "ALIBABA",
];

/// Adds the domain's `ip:`, `as:` and `special:` terms to the `Meta` block
/// and inbound anchor words to the `Link` block of each processed document.
#[derive(Debug, Clone, Default)]
pub struct DocumentDecorator {
    terms: Vec<String>,
    links: DomainLinks,
}

impl DocumentDecorator {
    pub fn new(
        domain: &EdgeDomain,
        ip: Option<&str>,
        geo_ip: &dyn GeoIpLookup,
        anchor_tags: &dyn AnchorTagsSource,
    ) -> Self {
        let mut terms = Vec::new();

        if let Some(ip) = ip.filter(|ip| !ip.is_empty()) {
            terms.push(format!("ip:{ip}"));

            if let Some(country) = geo_ip.country(ip) {
                terms.push(format!("ip:{}", country.to_lowercase()));
            }
            if let Some(asn) = geo_ip.asn_info(ip) {
                terms.push(format!("as:{}", asn.asn));
                terms.extend(
                    asn.org
                        .split('-')
                        .filter(|part| !part.is_empty())
                        .map(|part| format!("as:{}", part.to_lowercase())),
                );
                if is_cloud(&asn.org) {
                    terms.push("special:cloud".to_string());
                }
            }
        }

        if is_academic(domain) {
            terms.push("special:academia".to_string());
        }

        Self {
            terms,
            links: anchor_tags.anchor_tags(domain),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn links(&self) -> &DomainLinks {
        &self.links
    }

    /// Decorate `doc` in place. Documents without keywords are left alone.
    pub fn apply(&self, doc: &mut ProcessedDocument) {
        let Some(words) = doc.words.as_mut() else {
            return;
        };
        words.add_terms(IndexBlock::Meta, self.terms.iter().cloned());

        let Some(url) = &doc.url else {
            return;
        };
        let anchor_words = self
            .links
            .anchor_texts(url)
            .iter()
            .flat_map(|anchor| text::word_tokens(anchor))
            .filter(|word| !text::is_stop_word(word))
            .map(|word| text::stem(&word));
        words.add_terms(IndexBlock::Link, anchor_words);
    }
}

fn is_cloud(org: &str) -> bool {
    let org = org.to_uppercase();
    CLOUD_ORGS.iter().any(|cloud| org.contains(cloud))
}

/// `*.edu`, `*.ac.<cc>` and `*.edu.<cc>`.
fn is_academic(domain: &EdgeDomain) -> bool {
    let top = domain.top_domain.as_str();
    if top.ends_with(".edu") {
        return true;
    }
    let labels: Vec<&str> = top.split('.').collect();
    matches!(
        labels.as_slice(),
        [_, .., "ac" | "edu", cc] if cc.len() == 2 && cc.bytes().all(|b| b.is_ascii_lowercase())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::{NullAnchorTags, NullGeoIp, StaticAnchorTags, StaticGeoIp};
    use metadata::DocumentKeywords;
    use model::{EdgeUrl, ProcessedDocumentDetails};

    fn doc(url: &str) -> ProcessedDocument {
        ProcessedDocument::accepted(
            EdgeUrl::parse(url).unwrap(),
            ProcessedDocumentDetails::default(),
            DocumentKeywords::new(),
        )
    }

    #[test]
    fn ip_and_asn_terms() {
        let geo = StaticGeoIp::new()
            .with_country("52.1.2.3", "US")
            .with_asn("52.1.2.3", 16509, "AMAZON-02");
        let decorator = DocumentDecorator::new(
            &EdgeDomain::new("www.example.com"),
            Some("52.1.2.3"),
            &geo,
            &NullAnchorTags,
        );

        assert_eq!(
            decorator.terms(),
            ["ip:52.1.2.3", "ip:us", "as:16509", "as:amazon", "as:02", "special:cloud"]
        );
    }

    #[test]
    fn no_ip_means_no_ip_terms() {
        let decorator = DocumentDecorator::new(
            &EdgeDomain::new("example.com"),
            None,
            &NullGeoIp,
            &NullAnchorTags,
        );
        assert!(decorator.terms().is_empty());
    }

    #[test]
    fn academic_domains() {
        for host in ["cs.mit.edu", "www.ox.ac.uk", "dept.uni.edu.au"] {
            assert!(is_academic(&EdgeDomain::new(host)), "{host}");
        }
        for host in ["example.com", "ac.uk", "education.com", "bbc.co.uk"] {
            assert!(!is_academic(&EdgeDomain::new(host)), "{host}");
        }
    }

    #[test]
    fn apply_adds_meta_terms_and_anchor_words() {
        let domain = EdgeDomain::new("www.ox.ac.uk");
        let mut links = DomainLinks::new();
        links.add("/garden", "The Botanic Gardens");
        let mut tags = StaticAnchorTags::new();
        tags.insert(domain.clone(), links);

        let decorator = DocumentDecorator::new(&domain, Some("10.0.0.1"), &NullGeoIp, &tags);

        let mut page = doc("https://www.ox.ac.uk/garden");
        decorator.apply(&mut page);
        let words = page.words.as_ref().unwrap();

        assert!(words.contains(IndexBlock::Meta, "ip:10.0.0.1"));
        assert!(words.contains(IndexBlock::Meta, "special:academia"));
        assert!(words.contains(IndexBlock::Link, &text::stem("botanic")));
        assert!(words.contains(IndexBlock::Link, &text::stem("gardens")));
        assert!(!words.contains(IndexBlock::Link, "the"));

        let mut other = doc("https://www.ox.ac.uk/other");
        decorator.apply(&mut other);
        assert!(other.words.as_ref().unwrap().get(IndexBlock::Link).is_none());
    }

    #[test]
    fn stubs_are_not_decorated() {
        let decorator = DocumentDecorator::new(
            &EdgeDomain::new("a.com"),
            Some("1.1.1.1"),
            &NullGeoIp,
            &NullAnchorTags,
        );
        let mut stub = ProcessedDocument::disqualified_stub(None, model::DisqualificationReason::Length);
        decorator.apply(&mut stub);
        assert!(stub.words.is_none());
    }
}
