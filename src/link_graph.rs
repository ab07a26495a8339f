use std::collections::{HashMap, HashSet};

use model::{EdgeUrl, ProcessedDocument};

/// Internal links of one domain: source page to the set of pages it links to.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    graph: HashMap<EdgeUrl, HashSet<EdgeUrl>>,
}

impl LinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the internal links of `doc`. Documents without a URL or details
    /// are ignored, as are self-links and links to other domains.
    pub fn add(&mut self, doc: &ProcessedDocument) {
        let (Some(url), Some(details)) = (&doc.url, &doc.details) else {
            return;
        };

        let links: HashSet<EdgeUrl> = details
            .links_internal
            .iter()
            .filter(|link| link.domain == url.domain && *link != url)
            .cloned()
            .collect();

        if links.is_empty() {
            return;
        }
        self.graph.entry(url.clone()).or_default().extend(links);
    }

    /// Number of source pages with at least one internal link.
    pub fn size(&self) -> usize {
        self.graph.len()
    }

    pub fn links_from(&self, url: &EdgeUrl) -> Option<&HashSet<EdgeUrl>> {
        self.graph.get(url)
    }

    /// Destination page to the set of pages linking to it.
    pub fn invert(&self) -> InvertedLinkGraph {
        let mut inverted: HashMap<EdgeUrl, HashSet<EdgeUrl>> = HashMap::new();
        for (source, destinations) in &self.graph {
            for dest in destinations {
                inverted
                    .entry(dest.clone())
                    .or_default()
                    .insert(source.clone());
            }
        }
        InvertedLinkGraph { graph: inverted }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InvertedLinkGraph {
    graph: HashMap<EdgeUrl, HashSet<EdgeUrl>>,
}

impl InvertedLinkGraph {
    /// Number of distinct internal pages linking to `url`.
    pub fn num_links(&self, url: &EdgeUrl) -> usize {
        self.graph.get(url).map_or(0, HashSet::len)
    }

    pub fn linking_to(&self, url: &EdgeUrl) -> Option<&HashSet<EdgeUrl>> {
        self.graph.get(url)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EdgeUrl, &HashSet<EdgeUrl>)> {
        self.graph.iter()
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}
