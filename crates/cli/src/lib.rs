use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use notebook_core::{
    FileNotebookOps, FormatterConfig, NotebookError, NotebookOps, MAX_TABLE_ROWS,
    MAX_TEXT_OUTPUT_LENGTH,
};
use notebook_protocol::{serialize_json, serialize_json_pretty, OperationOutcome};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "notebook")]
#[command(about = "Bounded digests and structural edits for Jupyter notebooks", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Pretty-print the JSON result
    #[arg(long, global = true)]
    pretty: bool,

    /// Characters of text output shown inline before truncating
    #[arg(long, global = true, default_value_t = MAX_TEXT_OUTPUT_LENGTH)]
    max_text_chars: usize,

    /// Table body rows shown inline before truncating
    #[arg(long, global = true, default_value_t = MAX_TABLE_ROWS)]
    max_table_rows: usize,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a bounded digest of every cell and its outputs
    Render(RenderArgs),

    /// Print the full payload of one output (1-based indices from the digest locator)
    Fetch(FetchArgs),

    /// Replace the source of a cell; code cells lose their outputs
    Edit(EditArgs),

    /// Insert a new code or markdown cell at a 1-based position
    Add(AddArgs),

    /// Delete a cell
    Delete(DeleteArgs),

    /// Merge a cell with the one directly after it
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Notebook (.ipynb) path
    path: String,
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Notebook (.ipynb) path
    path: String,

    /// 1-based cell index
    #[arg(allow_hyphen_values = true)]
    cell: i64,

    /// 1-based output index
    #[arg(allow_hyphen_values = true)]
    output: i64,

    /// Preferred payload: image, text or table
    #[arg(long = "type")]
    type_hint: Option<String>,
}

/// Where new cell source comes from: the positional argument, `--file`, or stdin.
#[derive(Args, Debug)]
struct SourceArgs {
    /// Cell source (omit to read --file or stdin)
    source: Option<String>,

    /// Read the cell source from a file
    #[arg(long, conflicts_with = "source")]
    file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Notebook (.ipynb) path
    path: String,

    /// 1-based cell index
    #[arg(allow_hyphen_values = true)]
    cell: i64,

    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Args, Debug)]
struct AddArgs {
    /// Notebook (.ipynb) path
    path: String,

    /// 1-based position for the new cell (cell count + 1 appends)
    #[arg(allow_hyphen_values = true)]
    cell: i64,

    /// code or markdown
    kind: String,

    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    /// Notebook (.ipynb) path
    path: String,

    /// 1-based cell index
    #[arg(allow_hyphen_values = true)]
    cell: i64,
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// Notebook (.ipynb) path
    path: String,

    /// 1-based index of the first cell
    #[arg(allow_hyphen_values = true)]
    first: i64,

    /// 1-based index of the second cell (must be first + 1)
    #[arg(allow_hyphen_values = true)]
    second: i64,
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    if !run(cli)? {
        std::process::exit(1);
    }
    Ok(())
}

/// Execute one command and print its JSON record. Returns `false` when the record carries an
/// error.
pub fn run(cli: Cli) -> Result<bool> {
    let config = FormatterConfig::default()
        .with_max_text_chars(cli.max_text_chars)
        .with_max_table_rows(cli.max_table_rows);
    config.validate().map_err(NotebookError::invalid_config)?;
    let ops = FileNotebookOps::new(config);
    let pretty = cli.pretty;

    match cli.command {
        Commands::Render(args) => emit(&ops.render(&args.path), pretty),
        Commands::Fetch(args) => emit(
            &ops.fetch(&args.path, args.cell, args.output, args.type_hint.as_deref()),
            pretty,
        ),
        Commands::Edit(args) => {
            let source = read_source(&args.source)?;
            emit(&ops.replace_source(&args.path, args.cell, &source), pretty)
        }
        Commands::Add(args) => {
            let source = read_source(&args.source)?;
            emit(&ops.insert(&args.path, args.cell, &args.kind, &source), pretty)
        }
        Commands::Delete(args) => emit(&ops.delete(&args.path, args.cell), pretty),
        Commands::Merge(args) => emit(&ops.merge(&args.path, args.first, args.second), pretty),
    }
}

fn emit<T: Serialize + OperationOutcome>(record: &T, pretty: bool) -> Result<bool> {
    let output = if pretty {
        serialize_json_pretty(record)?
    } else {
        serialize_json(record)?
    };
    print_stdout(&output)?;
    Ok(!record.is_failure())
}

fn read_source(args: &SourceArgs) -> Result<String> {
    if let Some(raw) = &args.source {
        return Ok(raw.clone());
    }
    if let Some(path) = &args.file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read cell source from {}", path.display()));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read cell source from stdin")?;
    Ok(buffer)
}
