use notebook_protocol::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for notebook operations
pub type Result<T> = std::result::Result<T, NotebookError>;

/// Errors that can occur while loading, inspecting, or editing a notebook.
///
/// Indices in messages are the 1-based values the caller supplied.
#[derive(Error, Debug)]
pub enum NotebookError {
    /// The notebook path does not exist
    #[error("Notebook file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Error reading notebook: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid notebook JSON
    #[error("Error reading notebook: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error reading notebook: unsupported notebook format version {found} (expected 4)")]
    UnsupportedFormat { path: PathBuf, found: u32 },

    #[error("Error writing notebook: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error writing notebook: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cell index {index} out of bounds. Please use a 1-based index.")]
    CellOutOfBounds { index: i64 },

    #[error("Cell index {index} out of bounds for adding. Please use a 1-based index.")]
    InsertOutOfBounds { index: i64 },

    #[error("Output index {output} out of bounds for cell {cell}. Please use a 1-based index.")]
    OutputOutOfBounds { cell: i64, output: i64 },

    #[error("One or both cell indices ({first}, {second}) are out of bounds.")]
    MergeOutOfBounds { first: i64, second: i64 },

    #[error("Invalid cell type: {0}. Must be 'code' or 'markdown'.")]
    InvalidCellType(String),

    #[error("Cells are not consecutive. Cell {second} is not immediately after cell {first}.")]
    NotConsecutive { first: i64, second: i64 },

    #[error("Cell {index} is not a code cell or has no outputs.")]
    NoOutputs { index: i64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to generate cell id: {0}")]
    CellId(String),
}

impl NotebookError {
    /// Map onto the boundary error taxonomy.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Read { .. }
            | Self::Parse { .. }
            | Self::UnsupportedFormat { .. }
            | Self::Write { .. }
            | Self::Serialize { .. }
            | Self::CellId(_) => ErrorCode::IoFailure,
            Self::CellOutOfBounds { .. }
            | Self::InsertOutOfBounds { .. }
            | Self::OutputOutOfBounds { .. }
            | Self::MergeOutOfBounds { .. } => ErrorCode::OutOfBounds,
            Self::InvalidCellType(_) | Self::NotConsecutive { .. } | Self::InvalidConfig(_) => {
                ErrorCode::InvalidArgument
            }
            Self::NoOutputs { .. } => ErrorCode::StructuralMismatch,
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
