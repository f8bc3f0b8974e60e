use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    notebook_mcp::main_entry().await
}
