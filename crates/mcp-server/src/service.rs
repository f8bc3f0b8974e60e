//! MCP tools over [`NotebookOps`].
//!
//! Every tool answers with the operation's JSON record, both as text content and as
//! structured content. Records that carry an `error` are flagged with `is_error`; protocol
//! errors are reserved for failures of the server itself.

use std::sync::Arc;

use notebook_core::NotebookOps;
use notebook_protocol::OperationOutcome;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

const INSTRUCTIONS: &str = "Reads and edits Jupyter notebooks (.ipynb). Start with \
'get_formatted_content' for a bounded digest of every cell; summaries that hide content end \
with a locator '(cell C [1-based], output O [1-based])' to pass to 'get_full_output'. \
'edit_cell', 'add_cell', 'delete_cell' and 'merge_cells' rewrite the file in place. All cell \
and output indices are 1-based.";

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FormattedContentRequest {
    #[schemars(description = "Path to the .ipynb file")]
    pub filepath: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FullOutputRequest {
    #[schemars(description = "Path to the .ipynb file")]
    pub filepath: String,

    #[schemars(description = "1-based cell index, as shown in the locator")]
    pub cell_index: i64,

    #[schemars(description = "1-based output index within the cell, as shown in the locator")]
    pub output_index: i64,

    /// Preferred payload kind for rich outputs
    #[schemars(description = "Preferred payload: 'image', 'text' or 'table'")]
    pub type_hint: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EditCellRequest {
    #[schemars(description = "Path to the .ipynb file")]
    pub filepath: String,

    #[schemars(description = "1-based index of the cell to rewrite")]
    pub cell_index: i64,

    #[schemars(description = "Replacement source; code cells lose their outputs")]
    pub new_source_content: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddCellRequest {
    #[schemars(description = "Path to the .ipynb file")]
    pub filepath: String,

    #[schemars(description = "1-based position the new cell will occupy (count + 1 appends)")]
    pub cell_index: i64,

    #[schemars(description = "'code' or 'markdown'")]
    pub cell_type: String,

    #[schemars(description = "Source of the new cell")]
    pub source_content: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteCellRequest {
    #[schemars(description = "Path to the .ipynb file")]
    pub filepath: String,

    #[schemars(description = "1-based index of the cell to remove")]
    pub cell_index: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MergeCellsRequest {
    #[schemars(description = "Path to the .ipynb file")]
    pub filepath: String,

    #[schemars(description = "1-based index of the first cell")]
    pub cell_index1: i64,

    #[schemars(description = "1-based index of the second cell; must equal cell_index1 + 1")]
    pub cell_index2: i64,
}

#[derive(Clone)]
pub struct NotebookService {
    ops: Arc<dyn NotebookOps>,
    tool_router: ToolRouter<Self>,
}

impl NotebookService {
    pub fn new(ops: Arc<dyn NotebookOps>) -> Self {
        Self {
            ops,
            tool_router: Self::tool_router(),
        }
    }

    /// Run a (blocking, file-backed) operation off the async workers.
    async fn run<T, F>(&self, tool: &'static str, op: F) -> Result<CallToolResult, McpError>
    where
        T: Serialize + OperationOutcome + Send + 'static,
        F: FnOnce(&dyn NotebookOps) -> T + Send + 'static,
    {
        let ops = Arc::clone(&self.ops);
        let record = tokio::task::spawn_blocking(move || op(ops.as_ref()))
            .await
            .map_err(|err| McpError::internal_error(format!("{tool} task failed: {err}"), None))?;
        record_result(tool, &record)
    }
}

fn record_result<T>(tool: &str, record: &T) -> Result<CallToolResult, McpError>
where
    T: Serialize + OperationOutcome,
{
    let value = serde_json::to_value(record).map_err(|err| {
        McpError::internal_error(format!("{tool}: failed to serialize result: {err}"), None)
    })?;
    let text = serde_json::to_string_pretty(&value).map_err(|err| {
        McpError::internal_error(format!("{tool}: failed to serialize result: {err}"), None)
    })?;

    let content = vec![Content::text(text)];
    let mut result = if record.is_failure() {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    };
    result.structured_content = Some(value);
    Ok(result)
}

#[tool_router]
impl NotebookService {
    #[tool(
        description = "Render the whole notebook as a bounded digest: each cell's source plus one-line output summaries. Long text, tables, images and errors are shortened and tagged with a locator for get_full_output."
    )]
    pub async fn get_formatted_content(
        &self,
        Parameters(request): Parameters<FormattedContentRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_formatted_content", move |ops| {
            ops.render(&request.filepath)
        })
        .await
    }

    #[tool(
        description = "Return the untruncated payload of one output addressed by a locator (1-based cell and output indices). type_hint picks image/png, text/plain or text/html when the output carries several."
    )]
    pub async fn get_full_output(
        &self,
        Parameters(request): Parameters<FullOutputRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("get_full_output", move |ops| {
            ops.fetch(
                &request.filepath,
                request.cell_index,
                request.output_index,
                request.type_hint.as_deref(),
            )
        })
        .await
    }

    #[tool(
        description = "Replace the source of a cell (1-based). Outputs of a code cell are cleared because they no longer match the code."
    )]
    pub async fn edit_cell(
        &self,
        Parameters(request): Parameters<EditCellRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("edit_cell", move |ops| {
            ops.replace_source(
                &request.filepath,
                request.cell_index,
                &request.new_source_content,
            )
        })
        .await
    }

    #[tool(
        description = "Insert a new 'code' or 'markdown' cell so that it occupies the given 1-based position; use cell count + 1 to append."
    )]
    pub async fn add_cell(
        &self,
        Parameters(request): Parameters<AddCellRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("add_cell", move |ops| {
            ops.insert(
                &request.filepath,
                request.cell_index,
                &request.cell_type,
                &request.source_content,
            )
        })
        .await
    }

    #[tool(description = "Delete the cell at the given 1-based index.")]
    pub async fn delete_cell(
        &self,
        Parameters(request): Parameters<DeleteCellRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("delete_cell", move |ops| {
            ops.delete(&request.filepath, request.cell_index)
        })
        .await
    }

    #[tool(
        description = "Merge cell_index2 into cell_index1 (must be adjacent, 1-based). Sources are joined with a newline; the result is code only if both cells are code, otherwise markdown. Outputs are dropped."
    )]
    pub async fn merge_cells(
        &self,
        Parameters(request): Parameters<MergeCellsRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.run("merge_cells", move |ops| {
            ops.merge(&request.filepath, request.cell_index1, request.cell_index2)
        })
        .await
    }
}

#[tool_handler]
impl ServerHandler for NotebookService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}
