//! Text normalization and tokenization.
//!
//! Lowercases, strips non-word characters, splits on whitespace, then drops
//! short tokens and stopwords. The surviving sequence keeps its original
//! order; sliding-window extraction depends on it. The sequence is capped to
//! bound downstream cost.
//!
//! No suffix stripping is applied: token identity must be stable so that a
//! term and its repeat occurrences aggregate onto the same node.

/// Common English words carrying no topical signal.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "must", "can", "this", "that", "these", "those",
];

/// Check if a word is a stopword.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Normalize text into the qualifying token sequence.
///
/// Steps: lowercase, replace non-word characters with spaces, split on
/// whitespace, drop tokens of length <= 2 and stopwords, cap at `max_tokens`.
///
/// Empty input yields an empty sequence; tokenization has no failure modes.
pub fn tokenize(text: &str, max_tokens: usize) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                ' '
            }
        })
        .collect();

    normalized
        .split_whitespace()
        .filter(|word| word.len() > 2 && !is_stop_word(word))
        .take(max_tokens)
        .map(String::from)
        .collect()
}
