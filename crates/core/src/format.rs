//! One-line summaries of cell outputs.
//!
//! Every summary that hides content ends with [`HINT_FULL_OUTPUT`] and the output's
//! [`Locator`], which a caller passes back to `get_full_output` for the full payload.

use std::sync::Arc;

use crate::config::FormatterConfig;
use crate::locator::Locator;
use crate::model::{Output, ResultOutput, MIME_HTML, MIME_PLAIN, MIME_PNG};
use crate::table::{summarize_table, PatternTableExtractor, TableExtractor};
use crate::util::{exceeds_chars, truncate_to_chars};

pub const TRUNCATION_MARKER: &str = "[TRUNCATED]";
pub const HINT_FULL_OUTPUT: &str = "Use `get_full_output` for full content.";

#[derive(Clone)]
pub struct OutputFormatter {
    config: FormatterConfig,
    tables: Arc<dyn TableExtractor>,
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(FormatterConfig::default())
    }
}

impl std::fmt::Debug for OutputFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputFormatter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OutputFormatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self::with_table_extractor(config, Arc::new(PatternTableExtractor))
    }

    pub fn with_table_extractor(config: FormatterConfig, tables: Arc<dyn TableExtractor>) -> Self {
        Self { config, tables }
    }

    /// Summarize one output.
    ///
    /// Every summary that hides content ends with the same `(cell c [1-based], output o
    /// [1-based])` locator, error and "Other data type" summaries included, so callers parse a
    /// single suffix. Outputs with an unrecognized `output_type` yield an empty string rather
    /// than an error; the renderer skips them.
    pub fn format(&self, output: &Output, locator: &Locator) -> String {
        match output {
            Output::Stream(stream) => self.format_text(&stream.text, locator),
            Output::Result(result) => self.format_result(result, locator),
            Output::Error(error) => format!(
                "Error: {}: {} {HINT_FULL_OUTPUT} {locator}",
                error.ename, error.evalue
            ),
            Output::Unknown(unknown) => {
                log::debug!(
                    "no summary for output_type={} at {locator}",
                    unknown.output_type
                );
                String::new()
            }
        }
    }

    fn format_result(&self, result: &ResultOutput, locator: &Locator) -> String {
        if result.data.contains_key(MIME_PNG) {
            return format!(
                "Image (PNG) - {} {HINT_FULL_OUTPUT} {locator}",
                locator.image_id()
            );
        }
        if let Some(html) = result.text(MIME_HTML).filter(|html| has_table_tag(html)) {
            return summarize_table(self.tables.as_ref(), &html, locator, &self.config);
        }
        if let Some(text) = result.text(MIME_PLAIN) {
            return self.format_text(&text, locator);
        }
        let keys = result
            .data
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        format!("Other data type: {keys} {HINT_FULL_OUTPUT} {locator}")
    }

    fn format_text(&self, text: &str, locator: &Locator) -> String {
        let max = self.config.max_text_chars;
        if exceeds_chars(text, max) {
            return format!(
                "Text: {}... {TRUNCATION_MARKER} {HINT_FULL_OUTPUT} {locator}",
                truncate_to_chars(text, max)
            );
        }
        format!("Text: {text}")
    }
}

fn has_table_tag(html: &str) -> bool {
    html.to_ascii_lowercase().contains("<table")
}
