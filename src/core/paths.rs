//! Path utilities for user-typed folder paths

use std::env;
use std::path::{Path, PathBuf};

/// Strip whitespace and surrounding quotes from a typed or dragged-in path
pub fn clean_input(raw: &str) -> &str {
    raw.trim().trim_matches(|c: char| c == '\'' || c == '"').trim()
}

/// Expand a leading `~` to the home directory
pub fn expand_home(input: &str) -> PathBuf {
    let home = env::var_os("HOME").or_else(|| env::var_os("USERPROFILE"));
    match (input, home) {
        ("~", Some(home)) => PathBuf::from(home),
        (s, Some(home)) if s.starts_with("~/") => PathBuf::from(home).join(&s[2..]),
        (s, _) => PathBuf::from(s),
    }
}

/// Turn raw user input into an absolute path, resolving it when it exists
pub fn resolve_user_path(raw: &str) -> PathBuf {
    let path = expand_home(clean_input(raw));
    path.canonicalize().unwrap_or(path)
}

/// File name for display, falling back to the full path
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
