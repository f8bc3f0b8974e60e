//! HTML table → Markdown pipe table.
//!
//! [`PatternTableExtractor`] is a regex heuristic, not an HTML parser: it assumes
//! well-formed `<thead>`/`<tbody>` markup as emitted by dataframe renderers. Anything it cannot
//! read falls back to a truncated copy of the raw markup.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::FormatterConfig;
use crate::format::{HINT_FULL_OUTPUT, TRUNCATION_MARKER};
use crate::locator::Locator;
use crate::util::truncate_to_chars;

static THEAD: Lazy<Regex> = Lazy::new(|| compile(r"(?is)<thead.*?>(.*?)</thead>"));
static TH: Lazy<Regex> = Lazy::new(|| compile(r"(?is)<th.*?>(.*?)</th>"));
static TBODY: Lazy<Regex> = Lazy::new(|| compile(r"(?is)<tbody.*?>(.*?)</tbody>"));
static TR: Lazy<Regex> = Lazy::new(|| compile(r"(?is)<tr.*?>(.*?)</tr>"));
static TD: Lazy<Regex> = Lazy::new(|| compile(r"(?is)<td.*?>(.*?)</td>"));
static TAG: Lazy<Regex> = Lazy::new(|| compile(r"<.*?>"));
static ENTITY: Lazy<Regex> = Lazy::new(|| compile(r"&(#?[A-Za-z0-9]+);"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid table pattern {pattern}: {err}"))
}

/// Rows recovered from table markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTable {
    pub header: Vec<String>,
    /// Body rows kept (at most the requested row bound).
    pub rows: Vec<Vec<String>>,
    /// More body rows existed than were kept.
    pub truncated: bool,
}

impl ExtractedTable {
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }

    pub fn to_markdown(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 3);
        if !self.header.is_empty() {
            lines.push(pipe_row(&self.header));
            lines.push(format!("|{}", "---|".repeat(self.header.len())));
        }
        lines.extend(self.rows.iter().map(|row| pipe_row(row)));
        if self.truncated {
            lines.push(format!("... {TRUNCATION_MARKER}"));
        }
        lines.join("\n")
    }
}

fn pipe_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// Turns table markup into rows. Implementations return `None` when no table content is found.
pub trait TableExtractor: Send + Sync {
    fn extract(&self, markup: &str, max_rows: usize) -> Option<ExtractedTable>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PatternTableExtractor;

impl TableExtractor for PatternTableExtractor {
    fn extract(&self, markup: &str, max_rows: usize) -> Option<ExtractedTable> {
        let mut table = ExtractedTable::default();

        if let Some(head) = THEAD.captures(markup).and_then(|c| c.get(1)) {
            table.header = cell_texts(&TH, head.as_str());
        }

        if let Some(body) = TBODY.captures(markup).and_then(|c| c.get(1)) {
            let mut total_rows = 0usize;
            for row in TR.captures_iter(body.as_str()) {
                total_rows += 1;
                if total_rows > max_rows {
                    continue;
                }
                let Some(inner) = row.get(1) else {
                    continue;
                };
                let cells = cell_texts(&TD, inner.as_str());
                if !cells.is_empty() {
                    table.rows.push(cells);
                }
            }
            table.truncated = total_rows > max_rows;
        }

        if table.is_empty() {
            return None;
        }
        Some(table)
    }
}

fn cell_texts(pattern: &Regex, markup: &str) -> Vec<String> {
    pattern
        .captures_iter(markup)
        .filter_map(|c| c.get(1))
        .map(|m| clean_cell(m.as_str()))
        .collect()
}

fn clean_cell(raw: &str) -> String {
    let stripped = TAG.replace_all(raw, "");
    unescape_entities(&stripped).trim().to_string()
}

/// Resolve HTML5 named and numeric entities one at a time. Unknown or malformed entities and
/// bare `&` are kept as written.
fn unescape_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &regex::Captures<'_>| {
            decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(name: &str) -> Option<String> {
    match name.strip_prefix('#') {
        Some(number) => {
            let code = match number.strip_prefix(|c| c == 'x' || c == 'X') {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code).map(String::from)
        }
        None => quick_xml::escape::resolve_html5_entity(name).map(str::to_string),
    }
}

/// Summary line for an HTML table output, or the truncated markup when no table is readable.
pub fn summarize_table(
    extractor: &dyn TableExtractor,
    markup: &str,
    locator: &Locator,
    config: &FormatterConfig,
) -> String {
    match extractor.extract(markup, config.max_table_rows) {
        Some(table) => format!(
            "Table (HTML): \n```markdown\n{}\n```\n{HINT_FULL_OUTPUT} {locator}",
            table.to_markdown()
        ),
        None => format!(
            "HTML content (truncated): {}... {TRUNCATION_MARKER} {HINT_FULL_OUTPUT} {locator}",
            truncate_to_chars(markup, config.max_text_chars)
        ),
    }
}
