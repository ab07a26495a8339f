use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a block holds words read off the page or synthetic terms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IndexBlockType {
    /// Words that occur in the document text or its markup.
    PageData,
    /// Synthetic terms such as `ip:1.2.3.4` or `special:cloud`.
    Meta,
}

/// Named bucket of keywords within a document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum IndexBlock {
    Title,
    Link,
    Subjects,
    NamesWords,
    TfIdfHigh,
    TfIdfMedium,
    TfIdfLow,
    Words,
    Meta,
    Artifacts,
}

impl IndexBlock {
    pub const ALL: [IndexBlock; 10] = [
        IndexBlock::Title,
        IndexBlock::Link,
        IndexBlock::Subjects,
        IndexBlock::NamesWords,
        IndexBlock::TfIdfHigh,
        IndexBlock::TfIdfMedium,
        IndexBlock::TfIdfLow,
        IndexBlock::Words,
        IndexBlock::Meta,
        IndexBlock::Artifacts,
    ];

    pub const fn block_type(self) -> IndexBlockType {
        match self {
            IndexBlock::Meta | IndexBlock::Artifacts => IndexBlockType::Meta,
            _ => IndexBlockType::PageData,
        }
    }

    pub const fn is_page_data(self) -> bool {
        matches!(self.block_type(), IndexBlockType::PageData)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            IndexBlock::Title => "title",
            IndexBlock::Link => "link",
            IndexBlock::Subjects => "subjects",
            IndexBlock::NamesWords => "names_words",
            IndexBlock::TfIdfHigh => "tf_idf_high",
            IndexBlock::TfIdfMedium => "tf_idf_medium",
            IndexBlock::TfIdfLow => "tf_idf_low",
            IndexBlock::Words => "words",
            IndexBlock::Meta => "meta",
            IndexBlock::Artifacts => "artifacts",
        }
    }
}

impl fmt::Display for IndexBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
