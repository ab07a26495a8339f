//! Parsed URLs and domains.
//!
//! [`EdgeUrl`] is the converter's URL key: scheme, domain, optional port, path
//! and query. Fragments are dropped at parse time so that `page#a` and
//! `page#b` are the same document.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("malformed url {url:?}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("url {url:?} has no host")]
    MissingHost { url: String },

    #[error("unsupported scheme {scheme:?}")]
    UnsupportedScheme { scheme: String },
}

/// A host name split into its registrable part and the rest.
///
/// `www.bbc.co.uk` is `{ subdomain: "www", top_domain: "bbc.co.uk" }`. IP
/// addresses are kept whole as the top domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeDomain {
    pub subdomain: String,
    pub top_domain: String,
}

impl EdgeDomain {
    pub fn new(host: &str) -> Self {
        let host = host.trim_end_matches('.').to_ascii_lowercase();

        if host.parse::<IpAddr>().is_ok() || host.starts_with('[') {
            return Self {
                subdomain: String::new(),
                top_domain: host,
            };
        }

        let labels: Vec<&str> = host.split('.').collect();
        let keep = match labels.as_slice() {
            [_, .., second, tld] if tld.len() == 2 && is_second_level_suffix(second) => 3,
            _ => 2,
        };

        if labels.len() <= keep {
            return Self {
                subdomain: String::new(),
                top_domain: host,
            };
        }

        let split = labels.len() - keep;
        Self {
            subdomain: labels[..split].join("."),
            top_domain: labels[split..].join("."),
        }
    }

    /// Top-level domain label, e.g. `uk` for `bbc.co.uk`.
    pub fn tld(&self) -> &str {
        self.top_domain
            .rsplit('.')
            .next()
            .unwrap_or(self.top_domain.as_str())
    }
}

// `co.uk`, `ac.jp`, `com.au` and friends: short second-to-last labels under a
// two-letter country code.
fn is_second_level_suffix(label: &str) -> bool {
    matches!(
        label,
        "co" | "ac" | "edu" | "gov" | "com" | "net" | "org" | "or" | "ne" | "go"
    ) || label.len() <= 2
}

impl fmt::Display for EdgeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subdomain.is_empty() {
            f.write_str(&self.top_domain)
        } else {
            write!(f, "{}.{}", self.subdomain, self.top_domain)
        }
    }
}

impl FromStr for EdgeDomain {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(UrlError::MissingHost { url: s.to_string() });
        }
        Ok(EdgeDomain::new(trimmed))
    }
}

impl Serialize for EdgeDomain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EdgeDomain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// An absolute http(s) URL without fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeUrl {
    pub proto: String,
    pub domain: EdgeDomain,
    pub port: Option<u16>,
    pub path: String,
    pub param: Option<String>,
}

impl EdgeUrl {
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let url = Url::parse(raw.trim()).map_err(|err| UrlError::Malformed {
            url: raw.to_string(),
            reason: err.to_string(),
        })?;
        Self::from_url(&url)
    }

    /// Resolve `href` against this URL, as a browser would for a link on
    /// this page.
    pub fn join(&self, href: &str) -> Result<Self, UrlError> {
        let base = self.to_url()?;
        let joined = base.join(href.trim()).map_err(|err| UrlError::Malformed {
            url: href.to_string(),
            reason: err.to_string(),
        })?;
        Self::from_url(&joined)
    }

    pub fn from_url(url: &Url) -> Result<Self, UrlError> {
        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(UrlError::UnsupportedScheme {
                scheme: scheme.to_string(),
            });
        }
        let host = url.host_str().ok_or_else(|| UrlError::MissingHost {
            url: url.to_string(),
        })?;

        Ok(Self {
            proto: scheme.to_string(),
            domain: EdgeDomain::new(host),
            port: url.port(),
            path: url.path().to_string(),
            param: url.query().map(str::to_string),
        })
    }

    pub fn to_url(&self) -> Result<Url, UrlError> {
        let raw = self.to_string();
        Url::parse(&raw).map_err(|err| UrlError::Malformed {
            url: raw,
            reason: err.to_string(),
        })
    }

    /// Lowercased words of the path, split on non-alphanumerics.
    pub fn path_words(&self) -> impl Iterator<Item = String> + '_ {
        self.path
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
    }
}

impl fmt::Display for EdgeUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.proto, self.domain)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        f.write_str(&self.path)?;
        if let Some(param) = &self.param {
            write!(f, "?{param}")?;
        }
        Ok(())
    }
}

impl FromStr for EdgeUrl {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EdgeUrl::parse(s)
    }
}

impl Serialize for EdgeUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EdgeUrl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
