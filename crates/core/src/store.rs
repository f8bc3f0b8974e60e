use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::error::{NotebookError, Result};
use crate::model::Notebook;

const SUPPORTED_NBFORMAT: u32 = 4;

/// Load/save boundary for notebooks.
pub trait DocumentStore: Send + Sync {
    fn load(&self, path: &Path) -> Result<Notebook>;

    /// Persist the whole notebook. Either the new content is fully written or the previous
    /// file is left in place.
    fn save(&self, path: &Path, notebook: &Notebook) -> Result<()>;
}

/// `.ipynb` JSON files on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFileStore;

impl DocumentStore for JsonFileStore {
    fn load(&self, path: &Path) -> Result<Notebook> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                NotebookError::NotFound(path.to_path_buf())
            } else {
                NotebookError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let notebook = parse_notebook(path, &raw)?;
        log::debug!(
            "loaded {} ({} cells, nbformat {}.{})",
            path.display(),
            notebook.len(),
            notebook.nbformat,
            notebook.nbformat_minor
        );
        Ok(notebook)
    }

    fn save(&self, path: &Path, notebook: &Notebook) -> Result<()> {
        let text = to_ipynb_string(path, notebook)?;
        write_atomic(path, text.as_bytes()).map_err(|source| NotebookError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("saved {} ({} cells)", path.display(), notebook.len());
        Ok(())
    }
}

/// Parse notebook JSON; `path` is only used for error reporting.
pub fn parse_notebook(path: &Path, raw: &str) -> Result<Notebook> {
    let notebook: Notebook = serde_json::from_str(raw).map_err(|source| NotebookError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if notebook.nbformat != SUPPORTED_NBFORMAT {
        return Err(NotebookError::UnsupportedFormat {
            path: path.to_path_buf(),
            found: notebook.nbformat,
        });
    }
    Ok(notebook)
}

/// Serialize the way nbformat writes files: one-space indentation, trailing newline.
pub fn to_ipynb_string(path: &Path, notebook: &Notebook) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    notebook
        .serialize(&mut ser)
        .map_err(|source| NotebookError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
    buf.push(b'\n');
    String::from_utf8(buf).map_err(|err| NotebookError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::new(ErrorKind::InvalidData, err),
    })
}

/// Write through a uniquely named sibling temp file, then rename it over `path`. Concurrent
/// saves never share a temp file; the last rename wins.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = format!(
        ".{}.",
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("notebook")
    );
    let mut tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(parent)?;
    tmp.write_all(bytes)?;
    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
