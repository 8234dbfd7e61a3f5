//! Error kinds for document loading and analysis
//!
//! Every failure the shell can report to the user maps to one variant here.
//! Command handlers wrap these in `anyhow` with extra context.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("{} is not valid UTF-8 text (invalid byte at offset {offset})", .path.display())]
    Decode { path: PathBuf, offset: usize },

    #[error("extension '{0}' is not supported (expected .txt or .pdf)")]
    UnsupportedFormat(String),

    #[error("could not extract text from {}: {reason}", .path.display())]
    Extraction { path: PathBuf, reason: String },

    #[error("remote service error: {0}")]
    RemoteService(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AnalyzerError {
    /// Map an I/O error on `path` to the matching error kind
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => AnalyzerError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => AnalyzerError::PermissionDenied(path.to_path_buf()),
            _ => AnalyzerError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// Short machine-friendly code
    #[allow(dead_code)]
    pub fn code(&self) -> &'static str {
        match self {
            AnalyzerError::NotFound(_) => "NOT_FOUND",
            AnalyzerError::PermissionDenied(_) => "PERMISSION_DENIED",
            AnalyzerError::Decode { .. } => "DECODE_ERROR",
            AnalyzerError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AnalyzerError::Extraction { .. } => "EXTRACTION_ERROR",
            AnalyzerError::RemoteService(_) => "REMOTE_SERVICE_ERROR",
            AnalyzerError::Io { .. } => "IO_ERROR",
        }
    }
}
