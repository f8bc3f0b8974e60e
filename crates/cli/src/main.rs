use anyhow::Result;

fn main() -> Result<()> {
    notebook_cli::main_entry()
}
