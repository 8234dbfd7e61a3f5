//! lexis - interactive word statistics and AI summaries for text and PDF documents
//!
//! lexis provides:
//! - Text extraction from .txt and .pdf files
//! - Normalization (lowercase, ASCII punctuation removed) and word counting
//! - Character statistics and frequency thresholds
//! - Summaries through a remote language model

use anyhow::Result;
use clap::Parser;

mod backends;
mod cli;
mod core;
mod flows;
mod logging;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    logging::initialize(
        logging::level_from_flags(cli.quiet, cli.verbose),
        cli.log_file.as_deref(),
        !cli.no_color,
    );

    cli::run(cli)
}
