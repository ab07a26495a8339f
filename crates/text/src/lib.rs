//! Text layer for the crawl converter.
//!
//! Everything the keyword extractor and the deduplicator need to know about
//! raw document text lives here, so both see the same words.
//!
//! ## What we do
//!
//! - Unicode normalization (NFKC) and whitespace collapsing
//! - Sentence splitting with word positions and capitalization hints
//! - Stop word detection and a light suffix-stripping stemmer
//! - Body hashing (SHA-256 hex) for canonical-claim bookkeeping
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence. The same text always yields
//! the same sentences, stems and hashes.

mod hash;
mod normalize;
mod sentence;
mod stem;

pub use crate::hash::hash_body;
pub use crate::normalize::{collapse_whitespace, normalize};
pub use crate::sentence::{split_sentences, word_tokens, Sentence, Word};
pub use crate::stem::{english_agreement, is_stop_word, stem};
