//! Renderer module
//!
//! Renders analyses to text tables, JSON or Markdown.

use colored::Colorize;
use std::fmt::Write as _;

use crate::core::counter::{CharCount, TokenCount, DEFAULT_THRESHOLD};
use crate::core::paths::display_name;
use crate::core::model::Analysis;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
    /// Threshold for the "occurs more than N times" rows
    pub threshold: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            pretty: false,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Renderer for analyses
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render an analysis in the configured format
    pub fn render(&self, analysis: &Analysis) -> String {
        match self.config.format {
            OutputFormat::Text => self.render_text(analysis),
            OutputFormat::Json => self.render_json(analysis),
            OutputFormat::Markdown => self.render_markdown(analysis),
        }
    }

    fn render_json(&self, analysis: &Analysis) -> String {
        let result = if self.config.pretty {
            serde_json::to_string_pretty(analysis)
        } else {
            serde_json::to_string(analysis)
        };
        result.unwrap_or_else(|_| "{}".to_string())
    }

    fn render_text(&self, analysis: &Analysis) -> String {
        let words = &analysis.words;
        let threshold = self.config.threshold;

        let mut rows = vec![
            ("File".to_string(), display_name(&analysis.path)),
            ("Total words".to_string(), words.total_words.to_string()),
            ("Distinct words".to_string(), words.distinct_words.to_string()),
            (
                "Total characters".to_string(),
                analysis.characters.total_chars.to_string(),
            ),
            (
                "Characters (no spaces)".to_string(),
                analysis.characters.chars_no_whitespace.to_string(),
            ),
            (format!("Top {} words", words.top.len()), format_top(&words.top)),
            (
                format!("Words > {} times", threshold),
                words.words_above(threshold).len().to_string(),
            ),
        ];

        if let (Some(word), Some(count)) = (&words.target_word, words.target_word_count) {
            rows.push((format!("Occurrences of '{}'", word), count.to_string()));
        }

        render_table(("Metric", "Value"), &rows)
    }

    fn render_markdown(&self, analysis: &Analysis) -> String {
        let words = &analysis.words;
        let mut output = String::new();

        let _ = writeln!(output, "## `{}`\n", display_name(&analysis.path));
        output.push_str("| Metric | Value |\n|---|---|\n");
        let _ = writeln!(output, "| Total words | {} |", words.total_words);
        let _ = writeln!(output, "| Distinct words | {} |", words.distinct_words);
        let _ = writeln!(
            output,
            "| Total characters | {} |",
            analysis.characters.total_chars
        );
        let _ = writeln!(
            output,
            "| Words > {} times | {} |",
            self.config.threshold,
            words.words_above(self.config.threshold).len()
        );
        if let (Some(word), Some(count)) = (&words.target_word, words.target_word_count) {
            let _ = writeln!(output, "| Occurrences of `{}` | {} |", word, count);
        }

        if !words.top.is_empty() {
            output.push_str("\n### Top words\n\n");
            for (rank, entry) in words.top.iter().enumerate() {
                let _ = writeln!(output, "{}. `{}` ({})", rank + 1, entry.token, entry.count);
            }
        }

        output
    }
}

/// "word (count), word (count)" for a ranked list
pub fn format_top(top: &[TokenCount]) -> String {
    if top.is_empty() {
        return "-".to_string();
    }
    top.iter()
        .map(|t| format!("{} ({})", t.token, t.count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Lines listing characters above a threshold
pub fn render_char_frequencies(chars: &[CharCount], threshold: usize) -> String {
    if chars.is_empty() {
        return format!("No character occurs more than {} times.", threshold);
    }

    let mut output = format!("Characters occurring more than {} times:\n", threshold);
    for c in chars {
        let _ = writeln!(output, "  - {}: {} times", describe_char(c.character), c.count);
    }
    output
}

/// Printable label for a character (whitespace gets a name)
pub fn describe_char(c: char) -> String {
    match c {
        ' ' => "' ' (space)".to_string(),
        '\n' => "'\\n' (newline)".to_string(),
        '\t' => "'\\t' (tab)".to_string(),
        '\r' => "'\\r' (carriage return)".to_string(),
        c => format!("'{}'", c),
    }
}

/// Widest body a panel grows to before lines are wrapped
const PANEL_MAX_WIDTH: usize = 100;

/// Frame a block of Markdown with a title, used for summaries
///
/// Headings are shown bold without their `#` markers, `*`/`-` bullets become
/// `•` and `**` emphasis markers are dropped. Long lines are wrapped on spaces
/// so every row ends at the right border.
pub fn render_panel(title: &str, body: &str) -> String {
    let blocks: Vec<(String, bool)> = body.lines().map(markdown_line).collect();
    let body_width = blocks
        .iter()
        .map(|(line, _)| line.chars().count())
        .max()
        .unwrap_or(0)
        .min(PANEL_MAX_WIDTH);
    let width = body_width.max(title.chars().count());

    let rule = "─".repeat(width + 2);
    let mut output = format!("╭{}╮\n", rule);
    let _ = writeln!(output, "│ {} │", pad(title, width).cyan().bold());
    let _ = writeln!(output, "├{}┤", rule);
    for (line, heading) in &blocks {
        for row in wrap(line, width) {
            let row = pad(&row, width);
            if *heading {
                let _ = writeln!(output, "│ {} │", row.bold());
            } else {
                let _ = writeln!(output, "│ {} │", row);
            }
        }
    }
    let _ = write!(output, "╰{}╯", rule);
    output
}

/// Plain text of one Markdown line, and whether it is a heading
fn markdown_line(line: &str) -> (String, bool) {
    let line = line.trim_end();
    let stripped = line.trim_start();
    let indent = &line[..line.len() - stripped.len()];

    if stripped.starts_with('#') {
        let text = stripped.trim_start_matches('#').trim();
        return (text.replace("**", ""), true);
    }

    let text = match stripped
        .strip_prefix("* ")
        .or_else(|| stripped.strip_prefix("- "))
    {
        Some(rest) => format!("{}• {}", indent, rest),
        None => line.to_string(),
    };
    (text.replace("**", ""), false)
}

/// Split `line` into rows of at most `width` characters, breaking on spaces
fn wrap(line: &str, width: usize) -> Vec<String> {
    if width == 0 || line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut rows = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        let used = current.chars().count();
        if used > 0 && used + 1 + word.chars().count() > width {
            rows.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);

        // A single word wider than the panel is cut
        while current.chars().count() > width {
            let head: String = current.chars().take(width).collect();
            current = current.chars().skip(width).collect();
            rows.push(head);
        }
    }
    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.chars().count());
    format!("{}{}", text, " ".repeat(fill))
}

fn render_table(header: (&str, &str), rows: &[(String, String)]) -> String {
    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .chain(std::iter::once(header.0.len()))
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{}  {}",
        format!("{:<width$}", header.0, width = label_width).magenta().bold(),
        header.1.magenta().bold()
    );
    let _ = writeln!(output, "{}  {}", "─".repeat(label_width), "─".repeat(5));
    for (label, value) in rows {
        let _ = writeln!(
            output,
            "{}  {}",
            format!("{:<width$}", label, width = label_width).dimmed(),
            value
        );
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::DocumentKind;
    use crate::core::model::AnalyzeOptions;
    use std::path::PathBuf;

    fn sample() -> Analysis {
        Analysis::from_text(
            "Ciao, ciao! Mondo.",
            PathBuf::from("/tmp/ciao.txt"),
            DocumentKind::Plain,
            &AnalyzeOptions {
                top_k: 5,
                target_word: Some("ciao".to_string()),
            },
        )
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        let err = "xml".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("Unknown format"));
    }

    #[test]
    fn test_render_text_contains_metrics() {
        let output = Renderer::with_config(RenderConfig::default()).render(&sample());
        assert!(output.contains("ciao.txt"));
        assert!(output.contains("ciao (2), mondo (1)"));
        assert!(output.contains("Occurrences of 'ciao'"));
    }

    #[test]
    fn test_render_json_is_valid() {
        let output = Renderer::with_config(RenderConfig::new(OutputFormat::Json)).render(&sample());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["words"]["total_words"], 3);
        assert_eq!(value["words"]["top"][0]["token"], "ciao");
        assert_eq!(value["words"]["target_word_count"], 2);
    }

    #[test]
    fn test_render_markdown() {
        let output =
            Renderer::with_config(RenderConfig::new(OutputFormat::Markdown)).render(&sample());
        assert!(output.contains("| Total words | 3 |"));
        assert!(output.contains("1. `ciao` (2)"));
    }

    #[test]
    fn test_format_top_empty() {
        assert_eq!(format_top(&[]), "-");
    }

    #[test]
    fn test_render_char_frequencies() {
        let chars = vec![
            CharCount {
                character: ' ',
                count: 7,
            },
            CharCount {
                character: 'a',
                count: 6,
            },
        ];
        let output = render_char_frequencies(&chars, 5);
        assert!(output.contains("' ' (space): 7 times"));
        assert!(output.contains("'a': 6 times"));

        assert!(render_char_frequencies(&[], 5).contains("No character"));
    }

    #[test]
    fn test_render_panel_wraps_body() {
        let output = render_panel("Summary", "line one\nline two");
        assert!(output.contains("line one"));
        assert!(output.contains("line two"));
        assert!(output.starts_with('╭'));
        assert!(output.ends_with('╯'));
    }

    #[test]
    fn test_render_panel_rows_share_right_border() {
        let body = "A short line\n* a bullet with **bold** text\n\n".to_string() + &"word ".repeat(40);
        let output = render_panel("AI Summary", &body);

        // The title row carries color codes, so compare the uncolored rows
        let widths: Vec<usize> = output
            .lines()
            .enumerate()
            .filter(|(i, _)| *i != 1)
            .map(|(_, line)| line.chars().count())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{output}");
        assert!(output.lines().skip(2).all(|l| l.ends_with('│') || l.ends_with('┤') || l.ends_with('╯')));
        assert!(widths[0] <= PANEL_MAX_WIDTH + 4);

        assert!(output.contains("• a bullet with bold text"));
        assert!(!output.contains("**"));
    }

    #[test]
    fn test_markdown_line_heading() {
        assert_eq!(markdown_line("## Overview"), ("Overview".to_string(), true));
        assert_eq!(markdown_line("  - item"), ("  • item".to_string(), false));
        assert_eq!(markdown_line("plain"), ("plain".to_string(), false));
    }

    #[test]
    fn test_wrap_breaks_on_spaces_and_long_words() {
        assert_eq!(wrap("aaa bbb ccc", 7), vec!["aaa bbb", "ccc"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("", 10), vec![""]);
    }
}
