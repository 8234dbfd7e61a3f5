//! Analysis flow - extract, normalize and count one document

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

use crate::core::error::AnalyzerError;
use crate::core::extract::{extract_text, DocumentKind};
use crate::core::model::{AnalyzeOptions, Analysis};
use crate::core::render::{RenderConfig, Renderer};

/// Run the full pipeline on the document at `path`
pub fn analyze_document(path: &Path, options: &AnalyzeOptions) -> Result<Analysis, AnalyzerError> {
    let started = Instant::now();
    let kind = DocumentKind::from_path(path)?;
    let raw = extract_text(path)?;
    debug!("{}: extracted {} bytes", path.display(), raw.len());

    let analysis = Analysis::from_text(&raw, path.to_path_buf(), kind, options);
    info!(
        "analyzed {} ({} words, {} distinct) in {:?}",
        analysis.path.display(),
        analysis.words.total_words,
        analysis.words.distinct_words,
        started.elapsed()
    );
    Ok(analysis)
}

/// Analyze one document and print it in the configured format
pub fn run_stats(path: &Path, options: &AnalyzeOptions, config: RenderConfig) -> Result<()> {
    let analysis = analyze_document(path, options)
        .with_context(|| format!("Failed to analyze {}", path.display()))?;

    let output = Renderer::with_config(config).render(&analysis);
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_analyze_document_plain() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ciao.txt");
        fs::write(&path, "Ciao, ciao! Mondo.").unwrap();

        let options = AnalyzeOptions {
            top_k: 1,
            target_word: Some("Mondo".to_string()),
        };
        let analysis = analyze_document(&path, &options).unwrap();

        assert_eq!(analysis.kind, DocumentKind::Plain);
        assert_eq!(analysis.normalized, "ciao ciao mondo");
        assert_eq!(analysis.words.total_words, 3);
        assert_eq!(analysis.words.top.len(), 1);
        assert_eq!(analysis.words.top[0].token, "ciao");
        assert_eq!(analysis.words.target_word_count, Some(1));
        assert_eq!(analysis.characters.total_chars, 18);
    }

    #[test]
    fn test_analyze_document_unsupported() {
        let err = analyze_document(Path::new("notes.docx"), &AnalyzeOptions::default())
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_analyze_document_missing() {
        let dir = TempDir::new().unwrap();
        let err = analyze_document(&dir.path().join("gone.txt"), &AnalyzeOptions::default())
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::NotFound(_)));
    }
}
