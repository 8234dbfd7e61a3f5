//! Interactive shell - folder picker, file picker and per-file action menu
//!
//! The shell is generic over its input and output so it can be driven by
//! in-memory buffers. End of input is treated like an exit keyword.

use anyhow::Result;
use colored::Colorize;
use log::{info, warn};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::backends::summarize::{Language, Summarizer};
use crate::core::counter::{DEFAULT_THRESHOLD, DEFAULT_TOP_K};
use crate::core::extract::{list_documents, SUPPORTED_EXTENSIONS};
use crate::core::model::{AnalyzeOptions, Analysis};
use crate::core::paths::{display_name, resolve_user_path};
use crate::core::render::{render_char_frequencies, render_panel, RenderConfig, Renderer};
use crate::flows::analyze::analyze_document;

/// Words that leave the shell at any prompt offering it
pub const EXIT_KEYWORDS: &[&str] = &["q", "quit", "exit"];

pub fn is_exit_keyword(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    EXIT_KEYWORDS.contains(&input.as_str())
}

/// Shell settings
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub top_k: usize,
    pub threshold: usize,
    /// Folder to open first instead of asking
    pub start_folder: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            threshold: DEFAULT_THRESHOLD,
            start_folder: None,
        }
    }
}

enum FileChoice {
    File(PathBuf),
    ChangeFolder,
    Exit,
}

enum MenuExit {
    BackToList,
    Exit,
}

pub struct Shell<'a, R, W> {
    input: R,
    output: W,
    summarizer: &'a dyn Summarizer,
    config: ShellConfig,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(input: R, output: W, summarizer: &'a dyn Summarizer, config: ShellConfig) -> Self {
        Self {
            input,
            output,
            summarizer,
            config,
        }
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "{}", "Welcome to lexis, the text analyzer!".blue().bold())?;

        let mut folder = match self.config.start_folder.take() {
            Some(start) => self.check_folder(&start)?,
            None => None,
        };

        loop {
            let current = match folder.take() {
                Some(f) => f,
                None => match self.choose_folder()? {
                    Some(f) => f,
                    None => break,
                },
            };

            match self.choose_file(&current)? {
                FileChoice::Exit => break,
                FileChoice::ChangeFolder => continue,
                FileChoice::File(path) => {
                    folder = Some(current);

                    writeln!(self.output, "{}", format!("Loading {}...", display_name(&path)).dimmed())?;
                    let options = AnalyzeOptions {
                        top_k: self.config.top_k,
                        target_word: None,
                    };
                    let analysis = match analyze_document(&path, &options) {
                        Ok(a) => a,
                        Err(e) => {
                            warn!("failed to load {}: {}", path.display(), e);
                            writeln!(
                                self.output,
                                "{} {}",
                                "Error while reading/analyzing:".red().bold(),
                                e
                            )?;
                            if self.ask("Press Enter to continue...")?.is_none() {
                                break;
                            }
                            continue;
                        }
                    };

                    match self.file_menu(&analysis)? {
                        MenuExit::Exit => break,
                        MenuExit::BackToList => continue,
                    }
                }
            }
        }

        writeln!(self.output, "Goodbye! 👋")?;
        Ok(())
    }

    /// Print a prompt and read one line; `None` on end of input
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{} ", prompt.bold())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn error(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message.red().bold())?;
        Ok(())
    }

    /// Validate a folder; prints the problem and returns `None` if unusable
    fn check_folder(&mut self, path: &Path) -> Result<Option<PathBuf>> {
        if !path.exists() {
            self.error(&format!(
                "Error: the folder '{}' does not exist. Try again.",
                path.display()
            ))?;
            return Ok(None);
        }
        if !path.is_dir() {
            self.error(&format!(
                "Error: '{}' is not a folder. Try again.",
                path.display()
            ))?;
            return Ok(None);
        }
        Ok(Some(path.to_path_buf()))
    }

    fn choose_folder(&mut self) -> Result<Option<PathBuf>> {
        loop {
            writeln!(
                self.output,
                "{}",
                "Tip: drag the folder here or type its full path (e.g. ~/Documents/texts)".dimmed()
            )?;
            let Some(answer) = self.ask("Folder containing the documents ('q' to quit):")? else {
                return Ok(None);
            };
            if is_exit_keyword(&answer) {
                return Ok(None);
            }
            if answer.trim().is_empty() {
                continue;
            }

            let path = resolve_user_path(&answer);
            if let Some(folder) = self.check_folder(&path)? {
                info!("selected folder {}", folder.display());
                return Ok(Some(folder));
            }
        }
    }

    fn choose_file(&mut self, folder: &Path) -> Result<FileChoice> {
        loop {
            let files = match list_documents(folder) {
                Ok(files) => files,
                Err(e) => {
                    self.error(&format!("Error: {}", e))?;
                    return Ok(FileChoice::ChangeFolder);
                }
            };

            if files.is_empty() {
                let kinds: Vec<String> = SUPPORTED_EXTENSIONS.iter().map(|e| format!(".{}", e)).collect();
                writeln!(
                    self.output,
                    "{}",
                    format!("No {} files found in '{}'.", kinds.join(" or "), folder.display())
                        .yellow()
                        .bold()
                )?;
                return self.confirm_change_folder();
            }

            writeln!(
                self.output,
                "\n{}",
                format!("Files in {}:", display_name(folder)).green()
            )?;
            for (i, file) in files.iter().enumerate() {
                writeln!(self.output, "{}. {}", i + 1, display_name(file))?;
            }

            let Some(answer) =
                self.ask("Select a file number (0 to change folder, 'q' to quit):")?
            else {
                return Ok(FileChoice::Exit);
            };
            let answer = answer.trim();

            if is_exit_keyword(answer) {
                return Ok(FileChoice::Exit);
            }
            if answer == "0" {
                return Ok(FileChoice::ChangeFolder);
            }

            match answer.parse::<usize>() {
                Ok(n) if (1..=files.len()).contains(&n) => {
                    return Ok(FileChoice::File(files[n - 1].clone()));
                }
                Ok(_) => self.error(&format!("Please enter a number between 1 and {}", files.len()))?,
                Err(_) => self.error("Invalid input.")?,
            }
        }
    }

    fn confirm_change_folder(&mut self) -> Result<FileChoice> {
        loop {
            let Some(answer) = self.ask("Choose another folder? [Y/n]")? else {
                return Ok(FileChoice::Exit);
            };
            match answer.trim().to_lowercase().as_str() {
                "" | "y" | "yes" => return Ok(FileChoice::ChangeFolder),
                "n" | "no" => return Ok(FileChoice::Exit),
                other if is_exit_keyword(other) => return Ok(FileChoice::Exit),
                _ => self.error("Please answer y or n.")?,
            }
        }
    }

    fn file_menu(&mut self, analysis: &Analysis) -> Result<MenuExit> {
        let threshold = self.config.threshold;

        loop {
            writeln!(self.output, "\n{}", "What do you want to do with this file?".cyan().bold())?;
            writeln!(self.output, "1. Search for a word")?;
            writeln!(self.output, "2. Show statistics (words, characters, top {})", self.config.top_k)?;
            writeln!(self.output, "3. Show characters occurring more than {} times", threshold)?;
            writeln!(self.output, "4. AI summary")?;
            writeln!(self.output, "5. Back to the file list")?;
            writeln!(self.output, "6. Quit")?;

            let Some(choice) = self.ask("Choose an option:")? else {
                return Ok(MenuExit::Exit);
            };
            let choice = choice.trim();
            if is_exit_keyword(choice) {
                return Ok(MenuExit::Exit);
            }

            match choice {
                "1" => {
                    let Some(word) = self.ask("Word to search:")? else {
                        return Ok(MenuExit::Exit);
                    };
                    let count = analysis.words.count_of(&word);
                    writeln!(
                        self.output,
                        "\nThe word '{}' appears {} times.",
                        word.trim().green().bold(),
                        count.to_string().bold()
                    )?;
                }
                "2" => {
                    let config = RenderConfig::default().with_threshold(threshold);
                    let table = Renderer::with_config(config).render(analysis);
                    writeln!(self.output, "\n{}", "Statistics:".green().bold())?;
                    write!(self.output, "{}", table)?;

                    let common = analysis.words.words_above(threshold).len();
                    if common > 0 {
                        writeln!(
                            self.output,
                            "\n{}",
                            format!("{} words occur more than {} times.", common, threshold).dimmed()
                        )?;
                    }
                }
                "3" => {
                    let chars = analysis.characters.above(threshold);
                    writeln!(self.output, "\n{}", render_char_frequencies(&chars, threshold))?;
                }
                "4" => {
                    let Some(language) = self.choose_language()? else {
                        return Ok(MenuExit::Exit);
                    };
                    writeln!(
                        self.output,
                        "\n{}",
                        format!(
                            "Generating {} summary with {}... ⏳",
                            language,
                            self.summarizer.name()
                        )
                        .italic()
                    )?;
                    let summary = self.summarizer.summarize(&analysis.normalized, language);
                    let title = format!("AI Summary ({})", language);
                    writeln!(self.output, "{}\n", render_panel(&title, &summary))?;
                }
                "5" => return Ok(MenuExit::BackToList),
                "6" => return Ok(MenuExit::Exit),
                _ => self.error("Please choose an option from 1 to 6.")?,
            }
        }
    }

    fn choose_language(&mut self) -> Result<Option<Language>> {
        writeln!(self.output, "\n{}", "Which language should the summary be in?".cyan().bold())?;
        for (i, language) in Language::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, language)?;
        }

        loop {
            let Some(answer) = self.ask("Select [1]:")? else {
                return Ok(None);
            };
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(Some(Language::default()));
            }
            if let Ok(n) = answer.parse::<usize>() {
                if let Some(language) = n.checked_sub(1).and_then(|i| Language::ALL.get(i)) {
                    return Ok(Some(*language));
                }
            }
            if let Ok(language) = answer.parse::<Language>() {
                return Ok(Some(language));
            }
            self.error(&format!("Please choose 1-{}.", Language::ALL.len()))?;
        }
    }
}

/// Run the interactive shell on the process's stdin/stdout
pub fn run_shell(summarizer: &dyn Summarizer, config: ShellConfig) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Shell::new(stdin.lock(), stdout.lock(), summarizer, config).run()
}
