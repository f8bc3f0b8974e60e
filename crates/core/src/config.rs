use serde::{Deserialize, Serialize};

/// Character budget for plain-text summaries.
pub const MAX_TEXT_OUTPUT_LENGTH: usize = 500;

/// Data rows kept when an HTML table is summarized.
pub const MAX_TABLE_ROWS: usize = 5;

/// Budgets applied by the output formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatterConfig {
    /// Maximum characters of stream/plain text (and table fallback markup) shown inline
    pub max_text_chars: usize,

    /// Maximum body rows shown for an HTML table
    pub max_table_rows: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            max_text_chars: MAX_TEXT_OUTPUT_LENGTH,
            max_table_rows: MAX_TABLE_ROWS,
        }
    }
}

impl FormatterConfig {
    pub fn with_max_text_chars(mut self, max_text_chars: usize) -> Self {
        self.max_text_chars = max_text_chars;
        self
    }

    pub fn with_max_table_rows(mut self, max_table_rows: usize) -> Self {
        self.max_table_rows = max_table_rows;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_chars == 0 {
            return Err("max_text_chars must be > 0".to_string());
        }

        if self.max_table_rows == 0 {
            return Err("max_table_rows must be > 0".to_string());
        }

        Ok(())
    }
}
