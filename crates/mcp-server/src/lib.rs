//! Notebook MCP Server
//!
//! Lets AI agents read and edit Jupyter notebooks over the MCP protocol without flooding their
//! context window with raw outputs.
//!
//! ## Tools
//!
//! - `get_formatted_content` - Bounded digest of every cell and its outputs
//! - `get_full_output` - Untruncated payload behind a digest locator
//! - `edit_cell` / `add_cell` / `delete_cell` / `merge_cells` - Structural edits
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "notebook": {
//!       "command": "notebook-mcp",
//!       "env": { "NOTEBOOK_MCP_MAX_TEXT_CHARS": "500" }
//!     }
//!   }
//! }
//! ```

use std::sync::Arc;

use anyhow::Result;
use notebook_core::FileNotebookOps;
use rmcp::transport::stdio;
use rmcp::ServiceExt;

pub mod config;
pub mod service;

pub use config::{load_formatter_config_from_env, MAX_TABLE_ROWS_ENV, MAX_TEXT_CHARS_ENV};
pub use service::NotebookService;

pub async fn main_entry() -> Result<()> {
    // Logs go to stderr; stdout carries the MCP protocol.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = load_formatter_config_from_env();
    log::info!(
        "Starting notebook MCP server (max_text_chars={}, max_table_rows={})",
        config.max_text_chars,
        config.max_table_rows
    );

    let service = NotebookService::new(Arc::new(FileNotebookOps::new(config)));
    let server = service.serve(stdio()).await?;

    // Returns once the client disconnects.
    server.waiting().await?;

    log::info!("Notebook MCP server stopped");
    Ok(())
}
