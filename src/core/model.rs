//! Data model for an analyzed document

use serde::Serialize;
use std::path::PathBuf;

use crate::core::counter::{
    compute_char_statistics, compute_statistics, CharacterStatistics, StatisticsSnapshot,
    DEFAULT_TOP_K,
};
use crate::core::extract::DocumentKind;
use crate::core::normalize::normalize;

/// Options for analyzing a document
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub top_k: usize,
    pub target_word: Option<String>,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            target_word: None,
        }
    }
}

/// Everything computed for one loaded document
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub path: PathBuf,
    pub kind: DocumentKind,
    /// Character counts over the raw extracted text
    pub characters: CharacterStatistics,
    /// Word counts over the normalized text
    pub words: StatisticsSnapshot,
    /// Normalized text, kept for the summary request
    #[serde(skip)]
    pub normalized: String,
}

impl Analysis {
    /// Normalize and count already extracted text
    pub fn from_text(raw: &str, path: PathBuf, kind: DocumentKind, options: &AnalyzeOptions) -> Self {
        let characters = compute_char_statistics(raw);
        let normalized = normalize(raw);
        let words = compute_statistics(&normalized, options.top_k, options.target_word.as_deref());

        Self {
            path,
            kind,
            characters,
            words,
            normalized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_empty() {
        let analysis = Analysis::from_text(
            "",
            PathBuf::from("empty.txt"),
            DocumentKind::Plain,
            &AnalyzeOptions::default(),
        );
        assert_eq!(analysis.words.total_words, 0);
        assert!(analysis.words.top.is_empty());
        assert_eq!(analysis.characters.total_chars, 0);
    }

    #[test]
    fn test_analysis_serializes_without_text() {
        let analysis = Analysis::from_text(
            "a b a",
            PathBuf::from("x.txt"),
            DocumentKind::Plain,
            &AnalyzeOptions::default(),
        );
        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["kind"], "plain");
        assert_eq!(value["words"]["total_words"], 3);
        assert_eq!(value["words"]["word_counts"]["a"], 2);
        assert!(value.get("normalized").is_none());
    }
}
