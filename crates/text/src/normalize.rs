//! Unicode and whitespace normalization.
//!
//! Keyword extraction works on NFKC-normalized, lowercased text with
//! whitespace collapsed to single spaces, so that composed and decomposed
//! forms of the same word land on the same key.

use unicode_normalization::UnicodeNormalization;

/// NFKC-normalize, lowercase and collapse whitespace.
///
/// ```rust
/// use text::normalize;
///
/// assert_eq!(normalize("  Hello\n\tWORLD "), "hello world");
/// ```
pub fn normalize(text: &str) -> String {
    let folded: String = text.nfkc().flat_map(char::to_lowercase).collect();
    collapse_whitespace(&folded)
}

/// Collapses repeated whitespace, trims edges, and turns newlines into
/// single spaces.
///
/// ```rust
/// use text::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  hello   world  "), "hello world");
/// assert_eq!(collapse_whitespace(" \n\t "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(segment);
    }
    out
}
