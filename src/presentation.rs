/*!
 * Terminal presentation of check results.
 *
 * Reports are rendered as a plain-text table fitted to the terminal width,
 * with the flagged span of each context highlighted. Unknown words are
 * rendered as one line of quoted words, ready to paste into `--ignore-words`.
 */

use console::{measure_text_width, pad_str, Alignment, Style, Term};
use std::collections::BTreeSet;

use crate::checker::MistakeReport;
use crate::grammar::Match;

/// Table headers, in column order
const HEADERS: [&str; 4] = ["Line", "Language Error", "Line text", "Suggestions"];

/// Share of the terminal width for the message, context and suggestion columns
const COLUMN_SHARES: [f64; 3] = [0.38, 0.38, 0.15];

/// Width used when stdout is not a terminal
const FALLBACK_WIDTH: usize = 120;

/// Narrowest a wrapped column may get
const MIN_COLUMN_WIDTH: usize = 8;

const COLUMN_GAP: &str = "  ";

/// Renders mistake reports as text tables
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    width: usize,
    colored: bool,
}

impl ReportRenderer {
    /// Create a renderer for a fixed width, without colors
    pub fn new(width: usize) -> Self {
        Self { width, colored: false }
    }

    /// Create a renderer sized to the current terminal
    pub fn for_terminal() -> Self {
        let width = Term::stdout()
            .size_checked()
            .map(|(_, columns)| columns as usize)
            .unwrap_or(FALLBACK_WIDTH);
        Self {
            width,
            colored: console::colors_enabled(),
        }
    }

    /// Enable or disable highlighting
    pub fn with_colors(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Context of a match with the flagged span highlighted
    pub fn highlight(&self, m: &Match) -> String {
        let (before, flagged, after) = m.context_parts();
        if !self.colored {
            return format!("{}{}{}", before, flagged, after);
        }

        let style = Style::new().red().bold().force_styling(true);
        format!("{}{}{}", before, style.apply_to(flagged), after)
    }

    /// Render a report as a table; an empty report renders as an empty string
    pub fn render_report(&self, report: &MistakeReport) -> String {
        if report.is_empty() {
            return String::new();
        }

        let rows: Vec<[String; 4]> = report
            .iter()
            .map(|(line, m)| {
                [
                    line.to_string(),
                    m.message.clone(),
                    self.highlight(m),
                    m.replacements.join("; "),
                ]
            })
            .collect();

        self.render_table(&rows)
    }

    fn wrap_limits(&self) -> [Option<usize>; 4] {
        let limit = |share: f64| Some(((self.width as f64 * share).round() as usize).max(MIN_COLUMN_WIDTH));
        [None, limit(COLUMN_SHARES[0]), limit(COLUMN_SHARES[1]), limit(COLUMN_SHARES[2])]
    }

    fn render_table(&self, rows: &[[String; 4]]) -> String {
        let limits = self.wrap_limits();

        // Every cell becomes a list of physical lines
        let wrapped: Vec<Vec<Vec<String>>> = rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(limits)
                    .map(|(cell, limit)| wrap_cell(cell, limit))
                    .collect()
            })
            .collect();

        let mut widths: Vec<usize> = HEADERS.iter().map(|h| measure_text_width(h)).collect();
        for row in &wrapped {
            for (column, lines) in row.iter().enumerate() {
                for line in lines {
                    widths[column] = widths[column].max(measure_text_width(line));
                }
            }
        }

        let mut out = String::new();
        let header: Vec<String> = HEADERS
            .iter()
            .enumerate()
            .map(|(column, h)| pad_cell(h, widths[column], column))
            .collect();
        push_row(&mut out, &header);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_row(&mut out, &rule);

        for row in &wrapped {
            let height = row.iter().map(Vec::len).max().unwrap_or(1);
            for index in 0..height {
                let cells: Vec<String> = row
                    .iter()
                    .enumerate()
                    .map(|(column, lines)| {
                        let text = lines.get(index).map(String::as_str).unwrap_or("");
                        pad_cell(text, widths[column], column)
                    })
                    .collect();
                push_row(&mut out, &cells);
            }
        }

        out
    }
}

fn wrap_cell(cell: &str, limit: Option<usize>) -> Vec<String> {
    match limit {
        Some(width) if !cell.is_empty() => textwrap::wrap(cell, width)
            .into_iter()
            .map(|line| line.into_owned())
            .collect(),
        _ => vec![cell.to_string()],
    }
}

// Line numbers are right aligned, everything else left aligned
fn pad_cell(text: &str, width: usize, column: usize) -> String {
    let alignment = if column == 0 { Alignment::Right } else { Alignment::Left };
    pad_str(text, width, alignment, None).into_owned()
}

fn push_row(out: &mut String, cells: &[String]) {
    out.push_str(cells.join(COLUMN_GAP).trim_end());
    out.push('\n');
}

/// Render words as `"a" "b" "c"`; an empty set renders as an empty string
pub fn render_unknown_words(words: &BTreeSet<String>) -> String {
    if words.is_empty() {
        return String::new();
    }

    let quoted: Vec<String> = words.iter().map(|word| format!("\"{}\"", word)).collect();
    quoted.join(" ")
}
