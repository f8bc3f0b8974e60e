use notebook_core::{FormatterConfig, MAX_TABLE_ROWS, MAX_TEXT_OUTPUT_LENGTH};

pub const MAX_TEXT_CHARS_ENV: &str = "NOTEBOOK_MCP_MAX_TEXT_CHARS";
pub const MAX_TABLE_ROWS_ENV: &str = "NOTEBOOK_MCP_MAX_TABLE_ROWS";

/// Summary budgets from the process environment. Bad values are logged and replaced by the
/// built-in defaults; the server never refuses to start over them.
pub fn load_formatter_config_from_env() -> FormatterConfig {
    formatter_config_from(|key| std::env::var(key).ok())
}

fn formatter_config_from(lookup: impl Fn(&str) -> Option<String>) -> FormatterConfig {
    let config = FormatterConfig::default()
        .with_max_text_chars(read_budget(&lookup, MAX_TEXT_CHARS_ENV, MAX_TEXT_OUTPUT_LENGTH))
        .with_max_table_rows(read_budget(&lookup, MAX_TABLE_ROWS_ENV, MAX_TABLE_ROWS));
    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            log::warn!("Invalid formatter configuration ({err}); using defaults");
            FormatterConfig::default()
        }
    }
}

fn read_budget(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> usize {
    let Some(raw) = lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
    else {
        return default;
    };
    match raw.parse::<usize>() {
        Ok(value) if value > 0 => value,
        _ => {
            log::warn!("Ignoring {key}={raw:?}: expected a positive integer; falling back to {default}");
            default
        }
    }
}
