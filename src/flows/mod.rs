//! Flows module - User-facing workflows
//!
//! - analyze: extract → normalize → count for one document
//! - shell: the interactive folder/file/menu session

pub mod analyze;
pub mod shell;
