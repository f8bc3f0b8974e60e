//! # Notebook Core
//!
//! Compact, agent-facing access to Jupyter notebooks.
//!
//! ## Architecture
//!
//! ```text
//! path
//!   │
//!   ├──> DocumentStore::load → Notebook (cells + outputs)
//!   │
//!   ├──> read side
//!   │    ├─> render_document: per-cell digest, outputs via OutputFormatter
//!   │    │    └─> TableExtractor for HTML tables
//!   │    └─> fetch_output: full payload behind a Locator
//!   │
//!   └──> write side
//!        ├─> replace_source / insert_cell / delete_cell / merge_cells
//!        └─> DocumentStore::save (atomic)
//! ```
//!
//! Every caller-facing index is 1-based. [`NotebookOps`] bundles the six boundary
//! operations; each call loads the notebook fresh and (for mutations) writes it back, so
//! nothing is cached between calls. Two callers mutating the same path concurrently race:
//! the last save wins.
//!
//! ## Example
//!
//! ```rust,no_run
//! use notebook_core::{FileNotebookOps, FormatterConfig, NotebookOps};
//!
//! let ops = FileNotebookOps::new(FormatterConfig::default());
//! let digest = ops.render("analysis.ipynb");
//! if let Some(err) = &digest.error {
//!     eprintln!("{err}");
//! }
//! let full = ops.fetch("analysis.ipynb", 2, 1, Some("text"));
//! println!("{:?}", full.mime_type);
//! ```

mod config;
mod edit;
mod error;
mod fetch;
mod format;
mod locator;
mod model;
mod ops;
mod render;
mod store;
mod table;
mod util;

pub use config::{FormatterConfig, MAX_TABLE_ROWS, MAX_TEXT_OUTPUT_LENGTH};
pub use edit::{delete_cell, insert_cell, merge_cells, replace_source};
pub use error::{NotebookError, Result};
pub use fetch::{fetch_output, FullOutput};
pub use format::{OutputFormatter, HINT_FULL_OUTPUT, TRUNCATION_MARKER};
pub use locator::{Locator, TypeHint};
pub use model::{
    mime_text, Cell, CellKind, ErrorOutput, JsonMap, Notebook, Output, ResultOutput,
    StreamOutput, UnknownOutput, MIME_HTML, MIME_JSON, MIME_PLAIN, MIME_PNG,
};
pub use ops::{FileNotebookOps, NotebookOps};
pub use render::render_document;
pub use store::{parse_notebook, to_ipynb_string, DocumentStore, JsonFileStore};
pub use table::{summarize_table, ExtractedTable, PatternTableExtractor, TableExtractor};

pub use notebook_protocol::{
    EditResult, ErrorCode, FetchResult, InsertResult, RenderResult, NOT_INSERTED,
};
