//! Boundary operations: one load → work → (save) cycle per call.
//!
//! Nothing is cached between calls and no lock is taken, so two callers mutating the same
//! path concurrently race and the last save wins. Transports that need isolation must
//! serialize calls per path themselves.

use notebook_protocol::{EditResult, FetchResult, InsertResult, RenderResult};
use std::path::Path;

use crate::config::FormatterConfig;
use crate::edit;
use crate::error::{NotebookError, Result};
use crate::fetch::fetch_output;
use crate::format::OutputFormatter;
use crate::locator::{Locator, TypeHint};
use crate::model::Notebook;
use crate::render::render_document;
use crate::store::{DocumentStore, JsonFileStore};

/// The six notebook operations, as injected into a transport.
///
/// Indices are 1-based. Implementations never panic or return faults: failures are reported
/// in the record's `error` field.
pub trait NotebookOps: Send + Sync {
    fn render(&self, path: &str) -> RenderResult;

    fn fetch(
        &self,
        path: &str,
        cell_index: i64,
        output_index: i64,
        type_hint: Option<&str>,
    ) -> FetchResult;

    fn replace_source(&self, path: &str, cell_index: i64, new_text: &str) -> EditResult;

    fn insert(&self, path: &str, cell_index: i64, kind: &str, text: &str) -> InsertResult;

    fn delete(&self, path: &str, cell_index: i64) -> EditResult;

    fn merge(&self, path: &str, first: i64, second: i64) -> EditResult;
}

/// [`NotebookOps`] over a [`DocumentStore`] (JSON files by default).
#[derive(Debug, Clone)]
pub struct FileNotebookOps<S = JsonFileStore> {
    store: S,
    formatter: OutputFormatter,
}

impl FileNotebookOps<JsonFileStore> {
    pub fn new(config: FormatterConfig) -> Self {
        Self::with_store(JsonFileStore, OutputFormatter::new(config))
    }
}

impl<S: DocumentStore> FileNotebookOps<S> {
    pub fn with_store(store: S, formatter: OutputFormatter) -> Self {
        Self { store, formatter }
    }

    /// Load, apply `op`, save. Nothing is written unless `op` succeeds.
    fn mutate<T>(
        &self,
        path: &str,
        label: &str,
        op: impl FnOnce(&mut Notebook) -> Result<T>,
    ) -> Result<T> {
        let path_ref = Path::new(path);
        let mut notebook = self.store.load(path_ref)?;
        let out = op(&mut notebook)?;
        self.store.save(path_ref, &notebook)?;
        log::info!("{label} applied to {path} ({} cells)", notebook.len());
        Ok(out)
    }

    fn edit_result(path: &str, label: &str, result: Result<()>) -> EditResult {
        match result {
            Ok(()) => EditResult::ok(path),
            Err(err) => {
                log_failure(label, path, &err);
                EditResult::failed(path, err.code(), err.to_string())
            }
        }
    }
}

fn log_failure(label: &str, path: &str, err: &NotebookError) {
    log::warn!("{label} failed for {path}: {err} ({})", err.code());
}

impl<S: DocumentStore> NotebookOps for FileNotebookOps<S> {
    fn render(&self, path: &str) -> RenderResult {
        match self.store.load(Path::new(path)) {
            Ok(notebook) => RenderResult::ok(path, render_document(&notebook, &self.formatter)),
            Err(err) => {
                log_failure("render", path, &err);
                RenderResult::failed(path, err.code(), err.to_string())
            }
        }
    }

    fn fetch(
        &self,
        path: &str,
        cell_index: i64,
        output_index: i64,
        type_hint: Option<&str>,
    ) -> FetchResult {
        let locator =
            Locator::new(cell_index, output_index).with_type_hint(type_hint.and_then(TypeHint::parse));
        let fetched = self
            .store
            .load(Path::new(path))
            .and_then(|notebook| fetch_output(&notebook, &locator));
        match fetched {
            Ok(full) => FetchResult::ok(full.payload, full.mime_type),
            Err(err) => {
                log_failure("fetch", path, &err);
                FetchResult::failed(err.code(), err.to_string())
            }
        }
    }

    fn replace_source(&self, path: &str, cell_index: i64, new_text: &str) -> EditResult {
        let result = self.mutate(path, "replace_source", |notebook| {
            edit::replace_source(notebook, cell_index, new_text)
        });
        Self::edit_result(path, "replace_source", result)
    }

    fn insert(&self, path: &str, cell_index: i64, kind: &str, text: &str) -> InsertResult {
        let result = self.mutate(path, "insert", |notebook| {
            edit::insert_cell(notebook, cell_index, kind, text)
        });
        match result {
            Ok(()) => InsertResult::ok(path, cell_index),
            Err(err) => {
                log_failure("insert", path, &err);
                InsertResult::failed(path, err.code(), err.to_string())
            }
        }
    }

    fn delete(&self, path: &str, cell_index: i64) -> EditResult {
        let result = self.mutate(path, "delete", |notebook| {
            edit::delete_cell(notebook, cell_index).map(drop)
        });
        Self::edit_result(path, "delete", result)
    }

    fn merge(&self, path: &str, first: i64, second: i64) -> EditResult {
        let result = self.mutate(path, "merge", |notebook| {
            edit::merge_cells(notebook, first, second)
        });
        Self::edit_result(path, "merge", result)
    }
}
