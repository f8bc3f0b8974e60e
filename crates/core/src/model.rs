//! In-memory notebook tree (nbformat v4).
//!
//! Keys this crate does not interpret (cell metadata, ids, execution counts, output metadata,
//! unknown top-level fields) are carried in `extra` maps so a load/save cycle never drops them.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{NotebookError, Result};
use crate::util::hex_encode_lower;

pub type JsonMap = Map<String, Value>;

pub const MIME_PNG: &str = "image/png";
pub const MIME_HTML: &str = "text/html";
pub const MIME_PLAIN: &str = "text/plain";
pub const MIME_JSON: &str = "application/json";

/// First nbformat minor version whose cells carry an `id`.
const CELL_ID_MINOR: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub metadata: JsonMap,
    pub nbformat: u32,
    pub nbformat_minor: u32,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl Notebook {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: JsonMap::new(),
            nbformat: 4,
            nbformat_minor: CELL_ID_MINOR,
            extra: JsonMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Fresh cell for this notebook; gets a random id when the format version expects one.
    pub fn new_cell(&self, kind: CellKind, source: impl Into<String>) -> Result<Cell> {
        let mut cell = Cell::new(kind, source);
        if self.nbformat_minor >= CELL_ID_MINOR {
            cell.extra
                .insert("id".to_string(), Value::String(random_cell_id()?));
        }
        Ok(cell)
    }
}

fn random_cell_id() -> Result<String> {
    let mut bytes = [0u8; 4];
    getrandom::getrandom(&mut bytes).map_err(|err| NotebookError::CellId(err.to_string()))?;
    Ok(hex_encode_lower(&bytes))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Code,
    Markdown,
    Raw,
}

impl CellKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Markdown => "markdown",
            Self::Raw => "raw",
        }
    }

    /// Kinds a caller may create. `raw` cells are only ever inherited from the file.
    pub fn parse_insertable(raw: &str) -> Option<Self> {
        match raw {
            "code" => Some(Self::Code),
            "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }
}

/// One notebook cell. Outputs are only kept for code cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CellRecord", into = "CellRecord")]
pub struct Cell {
    kind: CellKind,
    source: String,
    outputs: Vec<Output>,
    extra: JsonMap,
}

impl Cell {
    pub fn new(kind: CellKind, source: impl Into<String>) -> Self {
        let mut extra = JsonMap::new();
        if kind == CellKind::Code {
            extra.insert("execution_count".to_string(), Value::Null);
        }
        extra.insert("metadata".to_string(), Value::Object(JsonMap::new()));
        Self {
            kind,
            source: source.into(),
            outputs: Vec::new(),
            extra,
        }
    }

    pub fn code(source: impl Into<String>) -> Self {
        Self::new(CellKind::Code, source)
    }

    pub fn markdown(source: impl Into<String>) -> Self {
        Self::new(CellKind::Markdown, source)
    }

    /// Attach outputs to a code cell. Ignored for other kinds.
    pub fn with_outputs(mut self, outputs: Vec<Output>) -> Self {
        if self.kind == CellKind::Code {
            self.outputs = outputs;
        }
        self
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn id(&self) -> Option<&str> {
        self.extra.get("id").and_then(Value::as_str)
    }

    /// Replace the source. Code cells drop their outputs: they were computed from the old code.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
        if self.kind == CellKind::Code {
            self.outputs.clear();
        }
    }
}

#[derive(Serialize, Deserialize)]
struct CellRecord {
    cell_type: CellKind,
    #[serde(default, with = "multiline")]
    source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    outputs: Option<Vec<Output>>,
    #[serde(flatten)]
    extra: JsonMap,
}

impl From<CellRecord> for Cell {
    fn from(record: CellRecord) -> Self {
        let outputs = match record.cell_type {
            CellKind::Code => record.outputs.unwrap_or_default(),
            _ => Vec::new(),
        };
        Self {
            kind: record.cell_type,
            source: record.source,
            outputs,
            extra: record.extra,
        }
    }
}

impl From<Cell> for CellRecord {
    fn from(cell: Cell) -> Self {
        let outputs = match cell.kind {
            CellKind::Code => Some(cell.outputs),
            _ => None,
        };
        Self {
            cell_type: cell.kind,
            source: cell.source,
            outputs,
            extra: cell.extra,
        }
    }
}

/// Output of an executed code cell, keyed by `output_type`.
///
/// `display_data` and `execute_result` share the [`ResultOutput`] shape. Any other tag is kept
/// verbatim as [`Output::Unknown`].
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Stream(StreamOutput),
    Result(ResultOutput),
    Error(ErrorOutput),
    Unknown(UnknownOutput),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamOutput {
    /// `stdout` or `stderr`
    pub name: String,
    #[serde(default, with = "multiline")]
    pub text: String,
    #[serde(flatten)]
    pub extra: JsonMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultOutput {
    /// Mime type → payload, in document order.
    #[serde(default)]
    pub data: JsonMap,
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl ResultOutput {
    /// Textual payload for `mime`, joining list-form values.
    pub fn text(&self, mime: &str) -> Option<String> {
        self.data.get(mime).and_then(mime_text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorOutput {
    pub ename: String,
    pub evalue: String,
    #[serde(default)]
    pub traceback: Vec<String>,
    #[serde(flatten)]
    pub extra: JsonMap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownOutput {
    pub output_type: String,
    pub raw: JsonMap,
}

impl Output {
    pub fn stream(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Stream(StreamOutput {
            name: name.into(),
            text: text.into(),
            extra: tagged("stream"),
        })
    }

    pub fn display_data(data: JsonMap) -> Self {
        let mut extra = tagged("display_data");
        extra.insert("metadata".to_string(), Value::Object(JsonMap::new()));
        Self::Result(ResultOutput { data, extra })
    }

    pub fn execute_result(data: JsonMap, execution_count: Option<u64>) -> Self {
        let mut extra = tagged("execute_result");
        extra.insert("metadata".to_string(), Value::Object(JsonMap::new()));
        extra.insert(
            "execution_count".to_string(),
            execution_count.map_or(Value::Null, Value::from),
        );
        Self::Result(ResultOutput { data, extra })
    }

    pub fn error(
        ename: impl Into<String>,
        evalue: impl Into<String>,
        traceback: Vec<String>,
    ) -> Self {
        Self::Error(ErrorOutput {
            ename: ename.into(),
            evalue: evalue.into(),
            traceback,
            extra: tagged("error"),
        })
    }

    pub fn output_type(&self) -> &str {
        let extra = match self {
            Self::Stream(out) => &out.extra,
            Self::Result(out) => &out.extra,
            Self::Error(out) => &out.extra,
            Self::Unknown(out) => return &out.output_type,
        };
        extra
            .get("output_type")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    fn from_value(value: Value) -> std::result::Result<Self, serde_json::Error> {
        let output_type = value
            .get("output_type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        match output_type.as_str() {
            "stream" => serde_json::from_value(value).map(Self::Stream),
            "display_data" | "execute_result" => serde_json::from_value(value).map(Self::Result),
            "error" => serde_json::from_value(value).map(Self::Error),
            _ => match value {
                Value::Object(raw) => Ok(Self::Unknown(UnknownOutput { output_type, raw })),
                other => Err(serde_json::Error::custom(format!(
                    "output must be a JSON object, got {other}"
                ))),
            },
        }
    }

    fn to_value(&self) -> std::result::Result<Value, serde_json::Error> {
        match self {
            Self::Stream(out) => serde_json::to_value(out),
            Self::Result(out) => serde_json::to_value(out),
            Self::Error(out) => serde_json::to_value(out),
            Self::Unknown(out) => Ok(Value::Object(out.raw.clone())),
        }
    }
}

impl Serialize for Output {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Output {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

fn tagged(output_type: &str) -> JsonMap {
    let mut map = JsonMap::new();
    map.insert(
        "output_type".to_string(),
        Value::String(output_type.to_string()),
    );
    map
}

/// Text of a mime-bundle value: a string, or a list of strings joined together.
pub fn mime_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => parts
            .iter()
            .map(Value::as_str)
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.concat()),
        _ => None,
    }
}

/// nbformat "multiline string": read as a string or a list of lines, written as lines.
mod multiline {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Whole(String),
        Lines(Vec<String>),
    }

    pub(super) fn serialize<S: Serializer>(text: &str, serializer: S) -> Result<S::Ok, S::Error> {
        text.split_inclusive('\n')
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<String, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Whole(text) => text,
            Raw::Lines(lines) => lines.concat(),
        })
    }
}
