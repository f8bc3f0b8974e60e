#![allow(dead_code)]

use anyhow::{Context, Result};
use rmcp::{
    model::{CallToolRequestParam, CallToolResult},
    service::{RunningService, Service, ServiceExt},
    transport::TokioChildProcess,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

pub fn locate_notebook_mcp_bin() -> Result<PathBuf> {
    if let Some(path) = option_env!("CARGO_BIN_EXE_notebook-mcp") {
        return Ok(PathBuf::from(path));
    }

    // `.../target/{debug|release}/deps/<test>` → `.../target/{debug|release}/notebook-mcp`
    if let Ok(exe) = std::env::current_exe() {
        if let Some(target_profile_dir) = exe.parent().and_then(|p| p.parent()) {
            let candidate = target_profile_dir.join("notebook-mcp");
            if candidate.exists() {
                return Ok(candidate);
            }
        }
    }

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let repo_root = manifest_dir
        .ancestors()
        .nth(2)
        .context("failed to resolve repo root from CARGO_MANIFEST_DIR")?;
    for rel in ["target/debug/notebook-mcp", "target/release/notebook-mcp"] {
        let candidate = repo_root.join(rel);
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    anyhow::bail!("failed to locate notebook-mcp binary; build with: cargo build -p notebook-mcp")
}

pub async fn start_mcp_server(
    env: &[(&str, &str)],
) -> Result<RunningService<rmcp::RoleClient, impl Service<rmcp::RoleClient>>> {
    let bin = locate_notebook_mcp_bin()?;

    let mut cmd = Command::new(bin);
    cmd.env_remove("NOTEBOOK_MCP_MAX_TEXT_CHARS");
    cmd.env_remove("NOTEBOOK_MCP_MAX_TABLE_ROWS");
    cmd.env("RUST_LOG", "warn");
    for (key, value) in env {
        cmd.env(key, value);
    }

    let transport = TokioChildProcess::new(cmd).context("spawn mcp server")?;
    tokio::time::timeout(Duration::from_secs(10), ().serve(transport))
        .await
        .context("timeout starting MCP server")?
        .context("start MCP server")
}

pub async fn call_tool(
    service: &RunningService<rmcp::RoleClient, impl Service<rmcp::RoleClient>>,
    name: &str,
    args: Value,
) -> Result<CallToolResult> {
    tokio::time::timeout(
        Duration::from_secs(10),
        service.call_tool(CallToolRequestParam {
            name: name.to_string().into(),
            arguments: args.as_object().cloned(),
        }),
    )
    .await
    .context("timeout calling tool")?
    .with_context(|| format!("call tool {name}"))
}

/// The JSON record a tool returned, checked to be identical in text and structured form.
pub fn record(result: &CallToolResult) -> Result<Value> {
    let text = result
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.as_str())
        .context("tool did not return text content")?;
    let parsed: Value = serde_json::from_str(text).context("tool text is not JSON")?;
    let structured = result
        .structured_content
        .clone()
        .context("tool did not return structured content")?;
    anyhow::ensure!(
        parsed == structured,
        "text and structured content disagree: {parsed} vs {structured}"
    );
    Ok(structured)
}

pub fn write_notebook(dir: &Path, name: &str, notebook: &Value) -> Result<String> {
    let path = dir.join(name);
    let raw = serde_json::to_string_pretty(notebook).context("serialize fixture")?;
    std::fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
    Ok(path.to_string_lossy().into_owned())
}

/// Two code cells (one with a long stdout stream) and a markdown note.
pub fn fixture_notebook() -> Value {
    serde_json::json!({
        "cells": [
            {
                "cell_type": "code",
                "execution_count": 1,
                "id": "aa000001",
                "metadata": {},
                "outputs": [
                    {"name": "stdout", "output_type": "stream", "text": ["y".repeat(700)]}
                ],
                "source": ["print('y' * 700)"]
            },
            {
                "cell_type": "markdown",
                "id": "aa000002",
                "metadata": {},
                "source": ["## Notes"]
            },
            {
                "cell_type": "code",
                "execution_count": 2,
                "id": "aa000003",
                "metadata": {},
                "outputs": [
                    {
                        "ename": "KeyError",
                        "evalue": "'missing'",
                        "output_type": "error",
                        "traceback": ["KeyError: 'missing'"]
                    }
                ],
                "source": ["lookup['missing']"]
            }
        ],
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 5
    })
}
