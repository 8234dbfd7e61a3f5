//! Core module - Text extraction, normalization and counting
//!
//! This module provides:
//! - Error kinds shared by every stage
//! - Document extraction for plain text and PDF
//! - Normalization (case folding and punctuation removal)
//! - Token and character counting
//! - The analysis model shared by every command
//! - Rendering of statistics
//! - Path helpers for user input
//! - Token estimation for LLM requests

pub mod counter;
pub mod error;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod paths;
pub mod render;
pub mod tokenizer;
