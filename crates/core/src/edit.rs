//! Structural edits over the cell list.
//!
//! Each function validates first and mutates only after every check has passed, so a failed
//! call leaves the notebook exactly as it was.

use crate::error::{NotebookError, Result};
use crate::locator::{existing_position, insertion_position};
use crate::model::{Cell, CellKind, Notebook};

/// Replace the source of cell `index`. Code cells lose their outputs.
pub fn replace_source(notebook: &mut Notebook, index: i64, source: &str) -> Result<()> {
    let pos = existing_position(index, notebook.len())
        .ok_or(NotebookError::CellOutOfBounds { index })?;
    notebook.cells[pos].set_source(source);
    Ok(())
}

/// Insert a new `code` or `markdown` cell so that it ends up at position `index`.
/// `index == len + 1` appends.
pub fn insert_cell(notebook: &mut Notebook, index: i64, kind: &str, source: &str) -> Result<()> {
    let pos = insertion_position(index, notebook.len())
        .ok_or(NotebookError::InsertOutOfBounds { index })?;
    let kind =
        CellKind::parse_insertable(kind).ok_or_else(|| NotebookError::InvalidCellType(kind.to_string()))?;
    let cell = notebook.new_cell(kind, source)?;
    notebook.cells.insert(pos, cell);
    Ok(())
}

/// Remove cell `index` and return it.
pub fn delete_cell(notebook: &mut Notebook, index: i64) -> Result<Cell> {
    let pos = existing_position(index, notebook.len())
        .ok_or(NotebookError::CellOutOfBounds { index })?;
    Ok(notebook.cells.remove(pos))
}

/// Merge cell `second` into cell `first`; `second` must directly follow `first`.
///
/// The result is a fresh cell with `first.source + "\n" + second.source`. It is a code cell
/// only when both inputs are code cells; any other combination becomes markdown, so prose is
/// never turned into executable code. Outputs of either input are dropped.
pub fn merge_cells(notebook: &mut Notebook, first: i64, second: i64) -> Result<()> {
    let len = notebook.len();
    let (Some(first_pos), Some(second_pos)) =
        (existing_position(first, len), existing_position(second, len))
    else {
        return Err(NotebookError::MergeOutOfBounds { first, second });
    };
    if second_pos != first_pos + 1 {
        return Err(NotebookError::NotConsecutive { first, second });
    }

    let head = &notebook.cells[first_pos];
    let tail = &notebook.cells[second_pos];
    let kind = if head.kind() == CellKind::Code && tail.kind() == CellKind::Code {
        CellKind::Code
    } else {
        CellKind::Markdown
    };
    let source = format!("{}\n{}", head.source(), tail.source());

    let merged = notebook.new_cell(kind, source)?;
    notebook.cells[first_pos] = merged;
    notebook.cells.remove(second_pos);
    Ok(())
}
