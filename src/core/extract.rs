//! Document text extraction
//!
//! Dispatches on the file extension:
//! - `.txt` files are read whole and must be valid UTF-8
//! - `.pdf` files are parsed and every page is extracted in order
//!
//! Anything else is rejected with `AnalyzerError::UnsupportedFormat`.

use log::{debug, warn};
use serde::Serialize;
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::error::AnalyzerError;

/// Extensions the extractor understands (lowercase, without the dot)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "pdf"];

/// Separator placed between the text of consecutive PDF pages
pub const PAGE_SEPARATOR: &str = "\n";

/// How a document stores its text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Plain UTF-8 text
    Plain,
    /// Paged document (PDF)
    Paged,
}

impl DocumentKind {
    /// Detect the kind from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, AnalyzerError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" => Ok(DocumentKind::Plain),
            "pdf" => Ok(DocumentKind::Paged),
            _ => {
                let shown = path
                    .extension()
                    .map(|e| format!(".{}", e.to_string_lossy()))
                    .unwrap_or_default();
                Err(AnalyzerError::UnsupportedFormat(shown))
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Plain => "plain",
            DocumentKind::Paged => "paged",
        }
    }
}

/// A document on disk, identified by its path and kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    pub kind: DocumentKind,
}

impl Document {
    /// Classify a path; fails only for unsupported extensions
    pub fn from_path(path: &Path) -> Result<Self, AnalyzerError> {
        Ok(Self {
            path: path.to_path_buf(),
            kind: DocumentKind::from_path(path)?,
        })
    }

    /// Read the document's full text
    pub fn read_text(&self) -> Result<String, AnalyzerError> {
        debug!("extracting {} document {}", self.kind.as_str(), self.path.display());
        match self.kind {
            DocumentKind::Plain => read_plain(&self.path),
            DocumentKind::Paged => read_paged(&self.path),
        }
    }
}

/// Extract the raw text of the file at `path`
pub fn extract_text(path: &Path) -> Result<String, AnalyzerError> {
    Document::from_path(path)?.read_text()
}

/// Check whether a path has a supported extension
pub fn is_supported(path: &Path) -> bool {
    DocumentKind::from_path(path).is_ok()
}

/// List supported documents directly inside `folder`, sorted by path
pub fn list_documents(folder: &Path) -> Result<Vec<PathBuf>, AnalyzerError> {
    if !folder.exists() {
        return Err(AnalyzerError::NotFound(folder.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("skipping unreadable entry in {}: {}", folder.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_supported(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Read file bytes; the handle is closed before this returns
fn read_bytes(path: &Path) -> Result<Vec<u8>, AnalyzerError> {
    let file = fs::File::open(path).map_err(|e| AnalyzerError::from_io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .map_err(|e| AnalyzerError::from_io(path, e))?;
    Ok(buffer)
}

fn read_plain(path: &Path) -> Result<String, AnalyzerError> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|e| AnalyzerError::Decode {
        path: path.to_path_buf(),
        offset: e.utf8_error().valid_up_to(),
    })
}

fn read_paged(path: &Path) -> Result<String, AnalyzerError> {
    let bytes = read_bytes(path)?;
    let extraction = |reason: String| AnalyzerError::Extraction {
        path: path.to_path_buf(),
        reason,
    };

    let doc = lopdf::Document::load_mem(&bytes).map_err(|e| extraction(e.to_string()))?;

    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err(extraction("document is encrypted".to_string()));
    }

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    debug!("{}: {} pages", path.display(), page_numbers.len());

    let mut pages = Vec::with_capacity(page_numbers.len());
    for number in page_numbers {
        let text = doc
            .extract_text(&[number])
            .map_err(|e| extraction(format!("page {}: {}", number, e)))?;
        pages.push(text);
    }

    Ok(pages.join(PAGE_SEPARATOR))
}
