//! Backends module - Remote service integrations
//!
//! Provides:
//! - summarize: AI summaries through the Gemini REST API

pub mod summarize;
