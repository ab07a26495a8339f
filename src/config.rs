//! YAML configuration for the converter.
//!
//! Every section and field is optional; missing values take the defaults
//! shown below.
//!
//! ```yaml
//! version: "1.0"
//!
//! domain:
//!   min_avg_document_quality: -5.0
//!   sideload_threshold_bytes: 10000000
//!   short_circuit: false
//!
//! site_words:
//!   min_documents: 25
//!   min_total_count: 15
//!   qualifying_proportion: 0.25
//!   max_keywords: 5
//!   adjacent_min_sources: 3
//!
//! dedup:
//!   k: 5
//!   w: 4
//!   bands: 16
//!   rows: 8
//!   threshold: 0.9
//!   min_document_words: 20
//!
//! document:
//!   min_document_words: 25
//!   min_document_quality: -15.0
//!   language_filter: true
//!   min_english_agreement: 0.15
//! ```

use std::fs;
use std::path::Path;

use dedup::DedupConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level converter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConverterConfig {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub domain: DomainConfig,

    #[serde(default)]
    pub site_words: SiteWordsConfig,

    #[serde(default)]
    pub dedup: DedupConfig,

    #[serde(default)]
    pub document: DocumentConfig,
}

impl ConverterConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: ConverterConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => {}
            v => return Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }

        self.domain.validate()?;
        self.site_words.validate()?;
        self.document.validate()?;
        self.dedup
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("dedup: {err}")))?;
        Ok(())
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            domain: DomainConfig::default(),
            site_words: SiteWordsConfig::default(),
            dedup: DedupConfig::default(),
            document: DocumentConfig::default(),
        }
    }
}

/// Domain-level processing knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainConfig {
    /// A document counts as "good" for the short-circuit check when its
    /// quality exceeds this value.
    #[serde(default = "default_min_avg_document_quality")]
    pub min_avg_document_quality: f64,

    /// Streams larger than this are converted in sideload mode.
    #[serde(default = "default_sideload_threshold_bytes")]
    pub sideload_threshold_bytes: u64,

    /// Stop extracting keywords once a domain proves to be mostly low quality.
    #[serde(default)]
    pub short_circuit: bool,
}

impl DomainConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if !self.min_avg_document_quality.is_finite() {
            return Err(ConfigLoadError::Validation(
                "domain.min_avg_document_quality must be finite".to_string(),
            ));
        }
        if self.sideload_threshold_bytes == 0 {
            return Err(ConfigLoadError::Validation(
                "domain.sideload_threshold_bytes must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            min_avg_document_quality: default_min_avg_document_quality(),
            sideload_threshold_bytes: default_sideload_threshold_bytes(),
            short_circuit: false,
        }
    }
}

/// Thresholds for common and adjacent site words.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteWordsConfig {
    /// Domains with fewer keyworded documents get no common site words.
    #[serde(default = "default_min_documents")]
    pub min_documents: usize,

    /// Total keyword occurrences a domain needs before any keyword qualifies.
    #[serde(default = "default_min_total_count")]
    pub min_total_count: usize,

    /// Share of documents a keyword must appear in.
    #[serde(default = "default_qualifying_proportion")]
    pub qualifying_proportion: f64,

    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// A keyword is adjacent when strictly more than this many linking pages
    /// share it.
    #[serde(default = "default_adjacent_min_sources")]
    pub adjacent_min_sources: usize,
}

impl SiteWordsConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if !(0.0..=1.0).contains(&self.qualifying_proportion) {
            return Err(ConfigLoadError::Validation(
                "site_words.qualifying_proportion must be in [0, 1]".to_string(),
            ));
        }
        if self.max_keywords == 0 {
            return Err(ConfigLoadError::Validation(
                "site_words.max_keywords must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SiteWordsConfig {
    fn default() -> Self {
        Self {
            min_documents: default_min_documents(),
            min_total_count: default_min_total_count(),
            qualifying_proportion: default_qualifying_proportion(),
            max_keywords: default_max_keywords(),
            adjacent_min_sources: default_adjacent_min_sources(),
        }
    }
}

/// Per-document acceptance thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentConfig {
    #[serde(default = "default_min_document_words")]
    pub min_document_words: usize,

    #[serde(default = "default_min_document_quality")]
    pub min_document_quality: f64,

    /// Reject documents that do not read as English.
    #[serde(default = "true_value")]
    pub language_filter: bool,

    /// Minimum share of English function words, see
    /// [`text::english_agreement`].
    #[serde(default = "default_min_english_agreement")]
    pub min_english_agreement: f64,
}

impl DocumentConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.min_document_words == 0 {
            return Err(ConfigLoadError::Validation(
                "document.min_document_words must be >= 1".to_string(),
            ));
        }
        if !self.min_document_quality.is_finite() {
            return Err(ConfigLoadError::Validation(
                "document.min_document_quality must be finite".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_english_agreement) {
            return Err(ConfigLoadError::Validation(
                "document.min_english_agreement must be in [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            min_document_words: default_min_document_words(),
            min_document_quality: default_min_document_quality(),
            language_filter: true,
            min_english_agreement: default_min_english_agreement(),
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}
fn true_value() -> bool {
    true
}
fn default_min_avg_document_quality() -> f64 {
    -5.0
}
fn default_sideload_threshold_bytes() -> u64 {
    10_000_000
}
fn default_min_documents() -> usize {
    25
}
fn default_min_total_count() -> usize {
    15
}
fn default_qualifying_proportion() -> f64 {
    0.25
}
fn default_max_keywords() -> usize {
    5
}
fn default_adjacent_min_sources() -> usize {
    3
}
fn default_min_document_words() -> usize {
    25
}
fn default_min_document_quality() -> f64 {
    -15.0
}
fn default_min_english_agreement() -> f64 {
    0.15
}
