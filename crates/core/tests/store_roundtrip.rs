mod support;

use std::path::Path;

use notebook_core::{
    parse_notebook, CellKind, DocumentStore, ErrorCode, FileNotebookOps, FormatterConfig,
    JsonFileStore, NotebookError, NotebookOps, Output,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use support::{sample_notebook, write_notebook, write_to};

#[test]
fn load_save_keeps_every_field() {
    let nb = write_notebook(&sample_notebook());
    let store = JsonFileStore;

    let loaded = store.load(&nb.path).unwrap();
    assert_eq!(loaded.len(), 4);
    assert_eq!(
        loaded.cells.iter().map(|cell| cell.kind()).collect::<Vec<_>>(),
        vec![CellKind::Markdown, CellKind::Code, CellKind::Code, CellKind::Raw]
    );
    assert_eq!(loaded.cells[0].source(), "# Sales report\n\nQuarterly numbers.");
    assert_eq!(loaded.cells[1].id(), Some("c0ffee02"));

    store.save(&nb.path, &loaded).unwrap();
    let reloaded = store.load(&nb.path).unwrap();
    assert_eq!(reloaded, loaded);

    let stored = nb.read_json();
    assert_eq!(stored["metadata"]["kernelspec"]["name"], "python3");
    assert_eq!(stored["nbformat_minor"], 5);
    assert_eq!(stored["cells"][0]["metadata"], json!({"tags": ["intro"]}));
    assert_eq!(stored["cells"][1]["execution_count"], 1);
    assert_eq!(stored["cells"][2]["outputs"][1]["execution_count"], 2);
    assert_eq!(stored["cells"][3]["source"], json!(["raw passthrough"]));
}

#[test]
fn unknown_keys_and_outputs_survive_an_edit() {
    let nb = write_notebook(&json!({
        "cells": [
            {
                "cell_type": "code",
                "execution_count": 4,
                "metadata": {"collapsed": false},
                "outputs": [
                    {"output_type": "widget_state", "state": {"value": 3}},
                    {"name": "stderr", "output_type": "stream", "text": "warn\n"}
                ],
                "source": "slider",
                "attachments_hint": "kept"
            },
            {"cell_type": "markdown", "metadata": {}, "source": "notes"}
        ],
        "metadata": {"language_info": {"name": "python"}},
        "nbformat": 4,
        "nbformat_minor": 2,
        "signature": "sha256:abc"
    }));

    let result = FileNotebookOps::new(FormatterConfig::default()).replace_source(
        nb.path_str(),
        2,
        "updated notes",
    );
    assert!(result.success, "{:?}", result.error);

    let stored = nb.read_json();
    assert_eq!(stored["signature"], "sha256:abc");
    assert_eq!(stored["metadata"]["language_info"]["name"], "python");
    assert_eq!(stored["cells"][0]["attachments_hint"], "kept");
    assert_eq!(stored["cells"][0]["execution_count"], 4);
    assert_eq!(
        stored["cells"][0]["outputs"],
        json!([
            {"output_type": "widget_state", "state": {"value": 3}},
            {"name": "stderr", "output_type": "stream", "text": ["warn\n"]}
        ])
    );
    assert_eq!(stored["cells"][1]["source"], json!(["updated notes"]));
}

#[test]
fn unknown_output_is_fetchable_as_json() {
    let nb = write_notebook(&json!({
        "cells": [{
            "cell_type": "code",
            "execution_count": 1,
            "metadata": {},
            "outputs": [{"output_type": "widget_state", "state": {"value": 3}}],
            "source": "w"
        }],
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 5
    }));
    let ops = FileNotebookOps::new(FormatterConfig::default());

    let fetched = ops.fetch(nb.path_str(), 1, 1, None);
    assert_eq!(fetched.mime_type.as_deref(), Some("application/json"));
    assert_eq!(
        fetched.payload,
        Some(json!({"output_type": "widget_state", "state": {"value": 3}}))
    );

    let digest = ops.render(nb.path_str()).digest;
    assert_eq!(
        digest,
        "[[Cell 1 - Code]]\n```\nw\n```\n[[Cell 1 - Output]]\n\n"
    );
}

#[test]
fn saved_file_uses_nbformat_layout() {
    let nb = write_notebook(&sample_notebook());
    let store = JsonFileStore;
    let loaded = store.load(&nb.path).unwrap();
    store.save(&nb.path, &loaded).unwrap();

    let raw = nb.read_raw();
    assert!(raw.starts_with("{\n \"cells\": [\n  {\n   \"cell_type\": \"markdown\","));
    assert!(raw.ends_with("}\n"));

    let leftovers: Vec<_> = std::fs::read_dir(nb.path.parent().unwrap())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
}

#[test]
fn parse_rejects_garbage_and_other_versions() {
    let path = Path::new("inline.ipynb");
    assert!(matches!(
        parse_notebook(path, "[]"),
        Err(NotebookError::Parse { .. })
    ));
    let err = parse_notebook(
        path,
        r#"{"cells": [], "metadata": {}, "nbformat": 5, "nbformat_minor": 0}"#,
    )
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::IoFailure);
    assert_eq!(
        err.to_string(),
        "Error reading notebook: unsupported notebook format version 5 (expected 4)"
    );
}

#[test]
fn code_cell_without_outputs_key_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sparse.ipynb");
    write_to(
        &path,
        &json!({
            "cells": [{"cell_type": "code", "source": ["print(1)"]}],
            "nbformat": 4,
            "nbformat_minor": 0
        }),
    );

    let loaded = JsonFileStore.load(&path).unwrap();
    assert!(loaded.cells[0].outputs().is_empty());
    assert!(loaded.metadata.is_empty());
    assert!(matches!(
        loaded.cells[0].clone().with_outputs(vec![Output::stream("stdout", "1\n")]).outputs(),
        [Output::Stream(_)]
    ));
}
