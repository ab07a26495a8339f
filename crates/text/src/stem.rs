//! Stop words and stemming.
//!
//! The stemmer is a small suffix stripper that maps common inflections of a
//! word onto one key. Stems are index keys, not display strings.

/// Suffixes stripped by [`stem`], longest first.
const SUFFIXES: &[&str] = &[
    "ization", "ational", "iveness", "fulness", "ousness", "ation", "ement", "ment", "able",
    "ible", "ness", "ical", "ings", "ing", "ies", "ive", "ful", "ous", "ity", "ed", "ly", "er",
    "es", "s",
];

/// Shortest stem [`stem`] will produce.
const MIN_STEM_LEN: usize = 3;

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "been", "before", "being", "both", "but", "by", "can", "could", "did", "do", "does", "each",
    "for", "from", "had", "has", "have", "he", "her", "here", "him", "his", "how", "i", "if", "in",
    "into", "is", "it", "its", "just", "may", "me", "might", "more", "most", "must", "my", "no",
    "nor", "not", "now", "of", "on", "only", "or", "other", "our", "out", "over", "own", "same",
    "shall", "she", "should", "so", "some", "such", "than", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "those", "through", "to", "too", "under", "up",
    "us", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "would", "you", "your",
];

/// Whether `word` (lowercased) is an English stop word.
///
/// ```rust
/// use text::is_stop_word;
///
/// assert!(is_stop_word("the"));
/// assert!(!is_stop_word("kernel"));
/// ```
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.binary_search(&word).is_ok()
}

/// Reduce a lowercased word to its stem.
///
/// ```rust
/// use text::stem;
///
/// assert_eq!(stem("gardening"), "garden");
/// assert_eq!(stem("gardens"), "garden");
/// assert_eq!(stem("glass"), "glass");
/// ```
pub fn stem(word: &str) -> String {
    let w = word.to_lowercase();

    for suffix in SUFFIXES {
        if w.len() >= suffix.len() + MIN_STEM_LEN && w.ends_with(suffix) {
            if *suffix == "s" && w.ends_with("ss") {
                break;
            }
            return w[..w.len() - suffix.len()].to_string();
        }
    }

    w
}

/// Fraction of `words` that are common English function words.
///
/// Running English prose sits well above 0.2; other languages (and keyword
/// soup) sit close to zero. Returns 0.0 for an empty slice.
///
/// ```rust
/// use text::english_agreement;
///
/// let words = ["the", "cat", "is", "on", "the", "mat"];
/// assert!(english_agreement(&words) > 0.5);
/// ```
pub fn english_agreement<S: AsRef<str>>(words: &[S]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }

    let hits = words.iter().filter(|w| is_stop_word(w.as_ref())).count();
    hits as f64 / words.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_words_are_sorted_for_binary_search() {
        let mut sorted = STOP_WORDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, STOP_WORDS);
    }

    #[test]
    fn short_words_are_left_alone() {
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("bus"), "bus");
        assert_eq!(stem("red"), "red");
    }

    #[test]
    fn inflections_share_a_stem() {
        assert_eq!(stem("connections"), stem("connection"));
        assert_eq!(stem("walked"), "walk");
        assert_eq!(stem("quickly"), "quick");
    }

    #[test]
    fn stemming_lowercases() {
        assert_eq!(stem("Servers"), "server");
    }

    #[test]
    fn german_text_has_low_agreement() {
        let words = ["der", "hund", "läuft", "schnell", "über", "die", "straße"];
        assert!(english_agreement(&words) < 0.05);
    }

    #[test]
    fn empty_agreement_is_zero() {
        let words: [&str; 0] = [];
        assert_eq!(english_agreement(&words), 0.0);
    }
}
