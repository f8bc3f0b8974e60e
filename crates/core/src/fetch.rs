use serde_json::{json, Value};

use crate::error::{NotebookError, Result};
use crate::locator::{existing_position, Locator};
use crate::model::{mime_text, CellKind, Notebook, Output, ResultOutput, MIME_JSON, MIME_PLAIN, MIME_PNG};

/// Full payload behind a locator.
#[derive(Debug, Clone, PartialEq)]
pub struct FullOutput {
    pub payload: Value,
    pub mime_type: String,
}

/// Resolve `locator` against the notebook as it is now and return the untruncated payload.
///
/// The locator is validated from scratch on every call; a locator quoted from an earlier
/// digest is only trusted if it still addresses an existing output.
pub fn fetch_output(notebook: &Notebook, locator: &Locator) -> Result<FullOutput> {
    let cell_pos = existing_position(locator.cell_index, notebook.len()).ok_or(
        NotebookError::CellOutOfBounds {
            index: locator.cell_index,
        },
    )?;
    let cell = &notebook.cells[cell_pos];
    if cell.kind() != CellKind::Code || cell.outputs().is_empty() {
        return Err(NotebookError::NoOutputs {
            index: locator.cell_index,
        });
    }

    let output_pos = existing_position(locator.output_index, cell.outputs().len()).ok_or(
        NotebookError::OutputOutOfBounds {
            cell: locator.cell_index,
            output: locator.output_index,
        },
    )?;

    let full = match &cell.outputs()[output_pos] {
        Output::Stream(stream) => FullOutput {
            payload: Value::String(stream.text.clone()),
            mime_type: format!("text/{}", stream.name),
        },
        Output::Result(result) => select_payload(result, locator),
        Output::Error(error) => FullOutput {
            payload: json!({
                "ename": error.ename,
                "evalue": error.evalue,
                "traceback": error.traceback,
            }),
            mime_type: MIME_JSON.to_string(),
        },
        Output::Unknown(unknown) => FullOutput {
            payload: Value::Object(unknown.raw.clone()),
            mime_type: MIME_JSON.to_string(),
        },
    };
    log::debug!("fetched {} payload at {locator}", full.mime_type);
    Ok(full)
}

/// Hinted mime type if present, then `text/plain`, then `image/png`, then the whole bundle as
/// JSON text.
fn select_payload(result: &ResultOutput, locator: &Locator) -> FullOutput {
    let hinted = locator
        .type_hint
        .map(|hint| hint.mime_type())
        .filter(|mime| result.data.contains_key(*mime));
    let chosen =
        hinted.or_else(|| [MIME_PLAIN, MIME_PNG].into_iter().find(|mime| result.data.contains_key(*mime)));

    match chosen.and_then(|mime| result.data.get(mime).map(|value| (mime, value))) {
        Some((mime, value)) => FullOutput {
            payload: mime_text(value).map_or_else(|| value.clone(), Value::String),
            mime_type: mime.to_string(),
        },
        None => FullOutput {
            payload: Value::String(Value::Object(result.data.clone()).to_string()),
            mime_type: MIME_JSON.to_string(),
        },
    }
}
