//! Logging initialization
//!
//! Diagnostics go to stderr so they never mix with prompts or results on
//! stdout. An optional log file receives the same records.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Map the CLI's quiet/verbose flags to a level
pub fn level_from_flags(quiet: bool, verbose: u8) -> LevelFilter {
    if quiet {
        return LevelFilter::Off;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the global logger; later calls are ignored
pub fn initialize(level: LevelFilter, log_file: Option<&Path>, color: bool) {
    let config = build_config();
    let color_choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Stderr,
        color_choice,
    )];

    if let Some(path) = log_file {
        // The file always records at least info, even when the terminal is quiet
        let file_level = level.max(LevelFilter::Info);
        if let Some(file_logger) = create_file_logger(path, file_level, config) {
            loggers.push(file_logger);
        }
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
