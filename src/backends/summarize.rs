//! Remote summary generation (Google Gemini)
//!
//! The summarizer never fails from the caller's point of view: a missing
//! credential or a failed request comes back as a displayable message.

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::core::error::AnalyzerError;
use crate::core::model::AnalyzeOptions;
use crate::core::render::render_panel;
use crate::core::tokenizer::estimate_tokens;
use crate::flows::analyze::analyze_document;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini REST endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Upper bound on characters sent in one request
pub const DEFAULT_MAX_CHARS: usize = 30_000;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Name of the environment variable holding the credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Language the summary is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    #[default]
    #[value(aliases = ["it", "italiano"])]
    Italian,
    #[value(aliases = ["en", "inglese"])]
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Italian, Language::English];

    pub fn name(&self) -> &'static str {
        match self {
            Language::Italian => "Italian",
            Language::English => "English",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "it" | "italian" | "italiano" => Ok(Language::Italian),
            "en" | "english" | "inglese" => Ok(Language::English),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

/// Settings for the remote summarizer
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub max_chars: usize,
    pub timeout: Duration,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_chars: DEFAULT_MAX_CHARS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Anything that turns a text into a summary
pub trait Summarizer {
    /// Human-readable backend name, shown while waiting
    fn name(&self) -> &str;

    /// Summarize `text` in `language`; errors come back as message text
    fn summarize(&self, text: &str, language: Language) -> String;
}

/// Keep at most `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Build the instruction sent to the model
pub fn build_prompt(text: &str, language: Language) -> String {
    format!(
        "Write a concise, well-structured summary in {} of the following text:\n\n{}",
        language.name(),
        text
    )
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn into_text(self) -> Result<String, AnalyzerError> {
        if let Some(err) = self.error {
            return Err(AnalyzerError::RemoteService(match err.code {
                Some(code) => format!("{} ({})", err.message, code),
                None => err.message,
            }));
        }

        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AnalyzerError::RemoteService(
                "the model returned an empty response".to_string(),
            ));
        }
        Ok(text)
    }
}

/// Summarizer backed by the Gemini `generateContent` REST call
#[derive(Debug, Clone)]
pub struct GeminiSummarizer {
    config: SummaryConfig,
}

impl GeminiSummarizer {
    pub fn new(config: SummaryConfig) -> Self {
        Self { config }
    }

    fn request(&self, api_key: &str, prompt: &str) -> Result<String, AnalyzerError> {
        let remote = |e: reqwest::Error| AnalyzerError::RemoteService(e.to_string());

        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(remote)?;

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        );
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!("POST {}", url);
        let response = client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .map_err(remote)?;

        let status = response.status();
        let parsed: GenerateResponse = response.json().map_err(|e| {
            AnalyzerError::RemoteService(format!("HTTP {}: unreadable response: {}", status, e))
        })?;

        if !status.is_success() && parsed.error.is_none() {
            return Err(AnalyzerError::RemoteService(format!("HTTP {}", status)));
        }
        parsed.into_text()
    }
}

impl Summarizer for GeminiSummarizer {
    fn name(&self) -> &str {
        &self.config.model
    }

    fn summarize(&self, text: &str, language: Language) -> String {
        let Some(api_key) = self.config.api_key.as_deref().filter(|k| !k.trim().is_empty())
        else {
            warn!("summary requested without an API key");
            return format!(
                "⚠️ Missing API key. Set {} in the environment or pass --api-key.",
                API_KEY_ENV
            );
        };

        let preview = truncate_chars(text, self.config.max_chars);
        if preview.len() < text.len() {
            info!(
                "summary input truncated to {} characters",
                self.config.max_chars
            );
        }

        let prompt = build_prompt(preview, language);
        info!(
            "requesting {} summary from {} (~{} tokens)",
            language,
            self.config.model,
            estimate_tokens(&prompt)
        );

        match self.request(api_key, &prompt) {
            Ok(summary) => summary,
            Err(e) => {
                warn!("summary request failed: {}", e);
                format!("❌ API error: {}", e)
            }
        }
    }
}

/// Summarize one document and print the result
pub fn run_summarize(path: &Path, language: Language, summarizer: &dyn Summarizer) -> Result<()> {
    let analysis = analyze_document(path, &AnalyzeOptions::default())
        .with_context(|| format!("Failed to analyze {}", path.display()))?;

    let summary = summarizer.summarize(&analysis.normalized, language);
    println!("{}", render_panel(&format!("AI Summary ({})", language), &summary));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("it".parse::<Language>().unwrap(), Language::Italian);
        assert_eq!("English".parse::<Language>().unwrap(), Language::English);
        assert_eq!(" inglese ".parse::<Language>().unwrap(), Language::English);
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::default(), Language::Italian);
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("perché sì", 6), "perché");
        assert_eq!(truncate_chars("", 0), "");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_build_prompt_names_language() {
        let prompt = build_prompt("testo", Language::English);
        assert!(prompt.contains("in English"));
        assert!(prompt.ends_with("\n\ntesto"));
    }

    #[test]
    fn test_missing_api_key_is_a_message() {
        let summarizer = GeminiSummarizer::new(SummaryConfig::default());
        let out = summarizer.summarize("some text", Language::Italian);
        assert!(out.contains(API_KEY_ENV));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let summarizer = GeminiSummarizer::new(SummaryConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        });
        let out = summarizer.summarize("some text", Language::English);
        assert!(out.contains("Missing API key"));
    }

    #[test]
    fn test_unreachable_endpoint_is_a_message() {
        let summarizer = GeminiSummarizer::new(SummaryConfig {
            api_key: Some("test-key".to_string()),
            endpoint: "http://127.0.0.1:1".to_string(),
            timeout: Duration::from_secs(5),
            ..Default::default()
        });
        let out = summarizer.summarize("some text", Language::English);
        assert!(out.starts_with("❌ API error"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hi" }],
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn test_response_text() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Un "},{"text":"riassunto."}],"role":"model"}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_text().unwrap(), "Un riassunto.");
    }

    #[test]
    fn test_response_error() {
        let raw = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let err = parsed.into_text().unwrap_err();
        assert!(err.to_string().contains("API key not valid (400)"));
    }

    #[test]
    fn test_response_empty() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.into_text().is_err());
    }
}
