//! Result records returned by every notebook operation.
//!
//! Failures never cross the boundary as faults: each record carries an `error` message (and a
//! machine-readable `error_code`) next to default/empty values.

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Index returned in [`InsertResult::inserted_at`] when the insertion did not happen.
pub const NOT_INSERTED: i64 = -1;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The notebook path does not exist.
    NotFound,
    /// Reading, parsing, or writing the notebook failed.
    IoFailure,
    /// A 1-based cell or output index is outside the valid range.
    OutOfBounds,
    /// Unknown cell type or non-adjacent merge pair.
    InvalidArgument,
    /// The addressed cell is not a code cell or carries no outputs.
    StructuralMismatch,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::IoFailure => "io_failure",
            Self::OutOfBounds => "out_of_bounds",
            Self::InvalidArgument => "invalid_argument",
            Self::StructuralMismatch => "structural_mismatch",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct RenderResult {
    /// Bounded text digest of the whole notebook (empty on failure).
    pub digest: String,
    pub path: String,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
}

impl RenderResult {
    pub fn ok(path: impl Into<String>, digest: String) -> Self {
        Self {
            digest,
            path: path.into(),
            error: None,
            error_code: None,
        }
    }

    pub fn failed(path: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            digest: String::new(),
            path: path.into(),
            error: Some(message.into()),
            error_code: Some(code),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct FetchResult {
    /// Full payload of the addressed output: a string for text/image data, an object for
    /// error records.
    pub payload: Option<serde_json::Value>,
    pub mime_type: Option<String>,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
}

impl FetchResult {
    pub fn ok(payload: serde_json::Value, mime_type: impl Into<String>) -> Self {
        Self {
            payload: Some(payload),
            mime_type: Some(mime_type.into()),
            error: None,
            error_code: None,
        }
    }

    pub fn failed(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            payload: None,
            mime_type: None,
            error: Some(message.into()),
            error_code: Some(code),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct EditResult {
    pub success: bool,
    pub path: String,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
}

impl EditResult {
    pub fn ok(path: impl Into<String>) -> Self {
        Self {
            success: true,
            path: path.into(),
            error: None,
            error_code: None,
        }
    }

    pub fn failed(path: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            path: path.into(),
            error: Some(message.into()),
            error_code: Some(code),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct InsertResult {
    pub success: bool,
    pub path: String,
    /// 1-based position of the new cell, or [`NOT_INSERTED`].
    pub inserted_at: i64,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
}

impl InsertResult {
    pub fn ok(path: impl Into<String>, inserted_at: i64) -> Self {
        Self {
            success: true,
            path: path.into(),
            inserted_at,
            error: None,
            error_code: None,
        }
    }

    pub fn failed(path: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            path: path.into(),
            inserted_at: NOT_INSERTED,
            error: Some(message.into()),
            error_code: Some(code),
        }
    }
}

/// Records that may carry a failure, so transports can flag them without knowing the shape.
pub trait OperationOutcome {
    fn error(&self) -> Option<&str>;

    fn is_failure(&self) -> bool {
        self.error().is_some()
    }
}

impl OperationOutcome for RenderResult {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl OperationOutcome for FetchResult {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl OperationOutcome for EditResult {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl OperationOutcome for InsertResult {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}
