use std::fmt::Write;

use crate::format::OutputFormatter;
use crate::locator::Locator;
use crate::model::{CellKind, Notebook};
use crate::util::capitalize;

/// Render the whole notebook as one digest: per cell a `[[Cell N - Kind]]` header, the
/// trimmed source in a fence, and for code cells one summary line per output.
pub fn render_document(notebook: &Notebook, formatter: &OutputFormatter) -> String {
    let mut out = String::new();
    for (cell_pos, cell) in notebook.cells.iter().enumerate() {
        let number = cell_pos + 1;
        let _ = writeln!(
            out,
            "[[Cell {number} - {}]]",
            capitalize(cell.kind().as_str())
        );
        out.push_str("```\n");
        out.push_str(cell.source().trim());
        out.push_str("\n```\n");

        if cell.kind() == CellKind::Code && !cell.outputs().is_empty() {
            let _ = writeln!(out, "[[Cell {number} - Output]]");
            for (output_pos, output) in cell.outputs().iter().enumerate() {
                let summary =
                    formatter.format(output, &Locator::from_positions(cell_pos, output_pos));
                if summary.is_empty() {
                    continue;
                }
                let _ = writeln!(out, "- {summary}");
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, Output};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn renders_headers_sources_and_outputs() {
        let unknown: Output =
            serde_json::from_value(json!({"output_type": "mystery"})).unwrap();
        let notebook = Notebook::new(vec![
            Cell::markdown("  # Title \n"),
            Cell::code("print('hi')\n").with_outputs(vec![Output::stream("stdout", "hi\n"), unknown]),
            Cell::code("x = 1"),
        ]);

        let digest = render_document(&notebook, &OutputFormatter::default());
        assert_eq!(
            digest,
            "[[Cell 1 - Markdown]]\n```\n# Title\n```\n\n\
             [[Cell 2 - Code]]\n```\nprint('hi')\n```\n[[Cell 2 - Output]]\n- Text: hi\n\n\n\
             [[Cell 3 - Code]]\n```\nx = 1\n```\n\n"
        );
    }

    #[test]
    fn empty_notebook_renders_empty_digest() {
        let digest = render_document(&Notebook::new(Vec::new()), &OutputFormatter::default());
        assert_eq!(digest, "");
    }
}
