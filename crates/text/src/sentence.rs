//! Sentence and word segmentation.
//!
//! Sentences come from Unicode sentence boundaries (UAX #29) and words from
//! Unicode word boundaries, after NFKC normalization. Each word keeps enough
//! context for the keyword extractor: its sentence, its position inside the
//! sentence and whether it was written capitalized.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// A single word occurrence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Word {
    /// Lowercased word text.
    pub text: String,
    /// Index of the word inside its sentence.
    pub index_in_sentence: usize,
    /// Whether the first character was uppercase in the source text.
    pub capitalized: bool,
}

/// A sentence with at least one word.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sentence {
    /// Zero-based sentence index within the text it was split from.
    pub index: usize,
    pub words: Vec<Word>,
}

impl Sentence {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Split text into sentences of words.
///
/// Sentences without any word (stray punctuation, whitespace) are skipped and
/// do not consume an index.
///
/// ```rust
/// use text::split_sentences;
///
/// let sentences = split_sentences("Hello there. Bye!");
/// assert_eq!(sentences.len(), 2);
/// assert_eq!(sentences[1].index, 1);
/// assert_eq!(sentences[1].words[0].text, "bye");
/// ```
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    let normalized: String = text.nfkc().collect();
    let mut out = Vec::new();

    for raw in normalized.unicode_sentences() {
        let words: Vec<Word> = raw
            .unicode_words()
            .enumerate()
            .map(|(index_in_sentence, w)| Word {
                text: w.to_lowercase(),
                index_in_sentence,
                capitalized: w.chars().next().is_some_and(char::is_uppercase),
            })
            .collect();

        if words.is_empty() {
            continue;
        }

        out.push(Sentence {
            index: out.len(),
            words,
        });
    }

    out
}

/// Lowercased word stream, in order, for shingling.
///
/// ```rust
/// use text::word_tokens;
///
/// assert_eq!(word_tokens("The Quick, brown fox."), vec!["the", "quick", "brown", "fox"]);
/// ```
pub fn word_tokens(text: &str) -> Vec<String> {
    let normalized: String = text.nfkc().collect();
    normalized
        .unicode_words()
        .map(str::to_lowercase)
        .collect()
}
