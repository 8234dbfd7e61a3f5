//! CLI module - Command-line interface definitions and handlers

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::backends::summarize::{
    GeminiSummarizer, Language, SummaryConfig, API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MAX_CHARS,
    DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
};
use crate::core::counter::{DEFAULT_THRESHOLD, DEFAULT_TOP_K};
use crate::core::render::{OutputFormat, RenderConfig};
use crate::core::model::AnalyzeOptions;
use crate::flows::shell::ShellConfig;

/// lexis - browse a folder of documents, count words and ask for AI summaries.
#[derive(Parser, Debug)]
#[command(name = "lexis")]
#[command(
    author,
    version,
    about,
    long_about = r#"lexis analyzes plain-text (.txt) and PDF (.pdf) documents.

Without a subcommand it starts an interactive session: pick a folder, pick a
file, then search words, show statistics or request an AI summary.

Examples:
    lexis
    lexis shell --folder ~/Documents/texts
    lexis stats notes.txt --top-k 10 --word ciao
    lexis stats report.pdf --format json --pretty
    lexis summarize report.pdf --language en
"#
)]
pub struct Cli {
    /// API key for the summary service.
    #[arg(
        long,
        global = true,
        env = "GEMINI_API_KEY",
        hide_env_values = true,
        value_name = "KEY",
        long_help = "API key for the Gemini summary service.\n\n\
Read from GEMINI_API_KEY when not given. Without a key, summaries are replaced\n\
by a warning message; everything else works."
    )]
    pub api_key: Option<String>,

    /// Model used for summaries.
    #[arg(long, global = true, env = "LEXIS_MODEL", default_value = DEFAULT_MODEL, value_name = "MODEL")]
    pub model: String,

    /// Base URL of the summary API.
    #[arg(long, global = true, env = "LEXIS_ENDPOINT", default_value = DEFAULT_ENDPOINT, hide = true)]
    pub endpoint: String,

    /// Maximum characters of text sent for a summary.
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_MAX_CHARS,
        value_name = "CHARS",
        long_help = "Maximum number of characters of the document sent to the model.\n\n\
Longer documents are truncated to respect the model's context size."
    )]
    pub max_chars: usize,

    /// Timeout for the summary request, in seconds.
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS, value_name = "SECS")]
    pub timeout: u64,

    /// Number of most frequent words to show.
    #[arg(long, global = true, default_value_t = DEFAULT_TOP_K, value_name = "N")]
    pub top_k: usize,

    /// Report words/characters occurring more than N times.
    #[arg(long, global = true, default_value_t = DEFAULT_THRESHOLD, value_name = "N")]
    pub threshold: usize,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no diagnostics).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (repeat for more diagnostics).
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        long_help = "Print diagnostics to stderr. -v shows info, -vv debug, -vvv trace."
    )]
    pub verbose: u8,

    /// Also write diagnostics to this file.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive session (the default).
    Shell {
        /// Open this folder instead of asking for one.
        #[arg(long, value_name = "DIR")]
        folder: Option<PathBuf>,
    },

    /// Print statistics for one document.
    #[command(long_about = "Extract, normalize and count one document, then print total words,\n\
distinct words, character counts and the most frequent words.\n\n\
Examples:\n\
  lexis stats notes.txt\n\
  lexis stats notes.txt --word ciao --format md\n")]
    Stats {
        /// Document to analyze (.txt or .pdf).
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Also report the occurrences of this word.
        #[arg(long, value_name = "WORD")]
        word: Option<String>,

        /// Output format (text/json/md).
        #[arg(long, default_value = "text", value_name = "FORMAT")]
        format: String,

        /// Pretty-print JSON output.
        #[arg(long)]
        pretty: bool,
    },

    /// Print an AI summary of one document.
    Summarize {
        /// Document to summarize (.txt or .pdf).
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Language of the summary.
        #[arg(long, value_enum, default_value_t = Language::Italian)]
        language: Language,
    },
}

impl Cli {
    /// Summary settings; the credential is taken from the parsed arguments only
    pub fn summary_config(&self) -> SummaryConfig {
        SummaryConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            max_chars: self.max_chars,
            timeout: Duration::from_secs(self.timeout),
        }
    }

    pub fn shell_config(&self, folder: Option<PathBuf>) -> ShellConfig {
        ShellConfig {
            top_k: self.top_k,
            threshold: self.threshold,
            start_folder: folder,
        }
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.api_key.is_none() {
        log::debug!("{} is not set; summaries are disabled", API_KEY_ENV);
    }
    let summarizer = GeminiSummarizer::new(cli.summary_config());

    match &cli.command {
        None => crate::flows::shell::run_shell(&summarizer, cli.shell_config(None)),

        Some(Commands::Shell { folder }) => {
            crate::flows::shell::run_shell(&summarizer, cli.shell_config(folder.clone()))
        }

        Some(Commands::Stats {
            file,
            word,
            format,
            pretty,
        }) => {
            let format: OutputFormat = match format.parse() {
                Ok(f) => f,
                Err(e) => bail!("{} (expected text, json or md)", e),
            };
            let options = AnalyzeOptions {
                top_k: cli.top_k,
                target_word: word.clone(),
            };
            let config = RenderConfig::new(format)
                .with_threshold(cli.threshold)
                .with_pretty(*pretty);
            crate::flows::analyze::run_stats(file, &options, config)
        }

        Some(Commands::Summarize { file, language }) => {
            crate::backends::summarize::run_summarize(file, *language, &summarizer)
        }
    }
}
