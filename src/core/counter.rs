//! Token and character counting
//!
//! All tables here keep first-occurrence order, so ranking ties are broken by
//! whichever entry appeared first in the input.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;

use crate::core::normalize::normalize_word;

/// Number of ranked tokens kept in a snapshot by default
pub const DEFAULT_TOP_K: usize = 5;

/// Default threshold for the "occurs more than N times" views
pub const DEFAULT_THRESHOLD: usize = 5;

/// A token with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenCount {
    pub token: String,
    pub count: usize,
}

/// Token → count mapping, iterated in first-occurrence order
#[derive(Debug, Clone, Default)]
pub struct TokenFrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<TokenCount>,
}

impl TokenFrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `token`
    pub fn add(&mut self, token: &str) {
        if let Some(&slot) = self.index.get(token) {
            self.entries[slot].count += 1;
        } else {
            self.index.insert(token.to_string(), self.entries.len());
            self.entries.push(TokenCount {
                token: token.to_string(),
                count: 1,
            });
        }
    }

    /// Occurrences of `token`, 0 when absent
    pub fn get(&self, token: &str) -> usize {
        self.index
            .get(token)
            .map(|&slot| self.entries[slot].count)
            .unwrap_or(0)
    }

    /// Number of distinct tokens
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    #[allow(dead_code)]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    #[allow(dead_code)]
    pub fn iter(&self) -> impl Iterator<Item = &TokenCount> {
        self.entries.iter()
    }

    /// The `k` most frequent tokens, descending, ties in first-occurrence order
    pub fn most_common(&self, k: usize) -> Vec<TokenCount> {
        let mut ranked: Vec<&TokenCount> = self.entries.iter().collect();
        // sort_by is stable, so equal counts keep insertion order
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.into_iter().take(k).cloned().collect()
    }

    /// Tokens occurring strictly more than `threshold` times
    pub fn above(&self, threshold: usize) -> Vec<&TokenCount> {
        self.entries
            .iter()
            .filter(|e| e.count > threshold)
            .collect()
    }
}

impl Serialize for TokenFrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.token, &entry.count)?;
        }
        map.end()
    }
}

/// Word statistics for one loaded document
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsSnapshot {
    pub total_words: usize,
    pub distinct_words: usize,
    pub top: Vec<TokenCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_word_count: Option<usize>,
    pub word_counts: TokenFrequencyTable,
}

impl StatisticsSnapshot {
    /// Occurrences of `word`, normalized the same way as the text
    pub fn count_of(&self, word: &str) -> usize {
        self.word_counts.get(&normalize_word(word))
    }

    /// Words occurring strictly more than `threshold` times
    pub fn words_above(&self, threshold: usize) -> Vec<&TokenCount> {
        self.word_counts.above(threshold)
    }
}

/// Tokenize normalized text on whitespace and build its statistics
pub fn compute_statistics(
    normalized: &str,
    top_k: usize,
    target_word: Option<&str>,
) -> StatisticsSnapshot {
    let mut table = TokenFrequencyTable::new();
    let mut total_words = 0usize;

    for token in normalized.split_whitespace() {
        table.add(token);
        total_words += 1;
    }

    let top = table.most_common(top_k);
    let (target_word, target_word_count) = match target_word {
        Some(word) => {
            let count = table.get(&normalize_word(word));
            (Some(word.to_string()), Some(count))
        }
        None => (None, None),
    };

    StatisticsSnapshot {
        total_words,
        distinct_words: table.len(),
        top,
        target_word,
        target_word_count,
        word_counts: table,
    }
}

/// A character with its occurrence count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharCount {
    pub character: char,
    pub count: usize,
}

/// Character statistics over raw (un-normalized) text
#[derive(Debug, Clone, Default, Serialize)]
pub struct CharacterStatistics {
    /// All characters, whitespace included
    pub total_chars: usize,
    /// Characters that are not whitespace
    pub chars_no_whitespace: usize,
    /// Per-character counts in first-occurrence order
    pub frequencies: Vec<CharCount>,
}

impl CharacterStatistics {
    /// Characters occurring strictly more than `threshold` times
    pub fn above(&self, threshold: usize) -> Vec<CharCount> {
        self.frequencies
            .iter()
            .filter(|c| c.count > threshold)
            .copied()
            .collect()
    }

    #[allow(dead_code)]
    pub fn count_of(&self, character: char) -> usize {
        self.frequencies
            .iter()
            .find(|c| c.character == character)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

/// Count characters of `text`
pub fn compute_char_statistics(text: &str) -> CharacterStatistics {
    let mut index: HashMap<char, usize> = HashMap::new();
    let mut frequencies: Vec<CharCount> = Vec::new();
    let mut total_chars = 0usize;
    let mut chars_no_whitespace = 0usize;

    for c in text.chars() {
        total_chars += 1;
        if !c.is_whitespace() {
            chars_no_whitespace += 1;
        }
        match index.get(&c) {
            Some(&slot) => frequencies[slot].count += 1,
            None => {
                index.insert(c, frequencies.len());
                frequencies.push(CharCount {
                    character: c,
                    count: 1,
                });
            }
        }
    }

    CharacterStatistics {
        total_chars,
        chars_no_whitespace,
        frequencies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::normalize;

    fn pairs(top: &[TokenCount]) -> Vec<(&str, usize)> {
        top.iter().map(|t| (t.token.as_str(), t.count)).collect()
    }

    #[test]
    fn test_compute_statistics_example() {
        let normalized = normalize("Ciao, ciao! Mondo.");
        let stats = compute_statistics(&normalized, 1, None);

        assert_eq!(stats.total_words, 3);
        assert_eq!(stats.word_counts.get("ciao"), 2);
        assert_eq!(stats.word_counts.get("mondo"), 1);
        assert_eq!(stats.word_counts.len(), 2);
        assert_eq!(pairs(&stats.top), vec![("ciao", 2)]);
    }

    #[test]
    fn test_compute_statistics_top_two() {
        let stats = compute_statistics("a a a b b c", 2, None);
        assert_eq!(pairs(&stats.top), vec![("a", 3), ("b", 2)]);
    }

    #[test]
    fn test_compute_statistics_empty() {
        let stats = compute_statistics("", DEFAULT_TOP_K, Some("anything"));
        assert_eq!(stats.total_words, 0);
        assert!(stats.top.is_empty());
        assert_eq!(stats.target_word_count, Some(0));
        assert_eq!(stats.count_of("other"), 0);
    }

    #[test]
    fn test_ties_follow_first_occurrence() {
        let stats = compute_statistics("z y x y z x w", 4, None);
        assert_eq!(pairs(&stats.top), vec![("z", 2), ("y", 2), ("x", 2), ("w", 1)]);
    }

    #[test]
    fn test_top_k_length_and_order() {
        let text = "one two two three three three four four four four";
        for k in 0..7 {
            let stats = compute_statistics(text, k, None);
            assert_eq!(stats.top.len(), k.min(4));
            for pair in stats.top.windows(2) {
                assert!(pair[0].count >= pair[1].count);
            }
        }
    }

    #[test]
    fn test_counts_sum_to_total() {
        let text = normalize("The cat and the hat.\nThe END, the end!");
        let stats = compute_statistics(&text, DEFAULT_TOP_K, None);
        assert_eq!(stats.word_counts.total(), stats.total_words);
        assert_eq!(stats.total_words, text.split_whitespace().count());
        assert!(stats.word_counts.iter().all(|e| !e.token.is_empty()));
    }

    #[test]
    fn test_target_word_is_normalized() {
        let stats = compute_statistics("ciao ciao mondo", DEFAULT_TOP_K, Some("  CIAO! "));
        assert_eq!(stats.target_word_count, Some(2));
        assert_eq!(stats.count_of("Mondo"), 1);
        assert_eq!(stats.count_of("nessuno"), 0);
    }

    #[test]
    fn test_words_above_threshold_filters_tokens() {
        let stats = compute_statistics("a a a b b c", DEFAULT_TOP_K, None);
        let above: Vec<_> = stats.words_above(1).iter().map(|t| t.token.clone()).collect();
        assert_eq!(above, vec!["a", "b"]);
        assert!(stats.words_above(3).is_empty());
    }

    #[test]
    fn test_table_serializes_in_order() {
        let stats = compute_statistics("b a b", DEFAULT_TOP_K, None);
        let json = serde_json::to_string(&stats.word_counts).unwrap();
        assert_eq!(json, r#"{"b":2,"a":1}"#);
    }

    #[test]
    fn test_char_statistics() {
        let stats = compute_char_statistics("aab b\n");
        assert_eq!(stats.total_chars, 6);
        assert_eq!(stats.chars_no_whitespace, 4);
        assert_eq!(stats.count_of('a'), 2);
        assert_eq!(stats.count_of('b'), 2);
        assert_eq!(stats.count_of(' '), 1);
        assert_eq!(stats.count_of('z'), 0);
        assert_eq!(stats.frequencies[0].character, 'a');

        let above: Vec<char> = stats.above(1).iter().map(|c| c.character).collect();
        assert_eq!(above, vec!['a', 'b']);
    }

    #[test]
    fn test_char_statistics_counts_chars_not_bytes() {
        let stats = compute_char_statistics("è è");
        assert_eq!(stats.total_chars, 3);
        assert_eq!(stats.count_of('è'), 2);
    }
}
