//! Keyword and document metadata for the index writer.
//!
//! This crate owns the packed formats shared between the converter and the
//! index: one `u64` per (document, keyword) pair ([`WordMetadata`]) and one
//! `u64` per document ([`DocumentMetadata`]). It also provides the per-block
//! keyword maps ([`DocumentKeywords`]) and the encoder that turns per-word
//! statistics into packed words ([`KeywordMetadata`]).
//!
//! ## Example
//!
//! ```rust
//! use metadata::{DocumentKeywords, IndexBlock, KeywordMetadata, WordFlag, WordMetadata};
//!
//! let mut encoder = KeywordMetadata::new();
//! encoder.mark(WordFlag::Title, "garden");
//! encoder.set_tf_idf("garden", 80);
//!
//! let mut keywords = DocumentKeywords::new();
//! keywords.add(IndexBlock::Title, "garden", encoder.metadata_for_word("garden"));
//!
//! let packed = keywords.metadata(IndexBlock::Title, "garden").unwrap();
//! assert_eq!(WordMetadata::decode(packed).tf_idf, 80);
//! assert!(WordMetadata::has_flag(packed, WordFlag::Title));
//! ```

mod block;
mod document;
mod encoder;
mod flags;
mod keywords;
mod word;

pub use crate::block::{IndexBlock, IndexBlockType};
pub use crate::document::{encode_domain_size, DocumentMetadata};
pub use crate::encoder::{
    position_bit, KeywordMetadata, SENTENCES_PER_POSITION_BIT, TF_IDF_HIGH_LIMIT,
    TF_IDF_MEDIUM_LIMIT,
};
pub use crate::flags::{WordFlag, WordFlagSet};
pub use crate::keywords::{DocumentKeywords, KeywordSet};
pub use crate::word::WordMetadata;
