//! Table, detail and JSON renderers.

use std::io::Write;

use serde::Serialize;

use crate::document::{Document, sparse};
use crate::error::{Error, ErrorKind, Result};
use crate::project::field::is_empty_cell;
use crate::project::{Row, cell_text};

use super::registry::ResourceDescriptor;

/// Widest a table cell may be before it is cut with `...`.
pub const MAX_CELL_WIDTH: usize = 40;

/// How to render a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Print JSON instead of text.
    pub json: bool,
    /// Drop null and empty-string cells from projected JSON rows.
    pub omit_null: bool,
    /// Echo the server's fields instead of projecting rows.
    pub sparse: bool,
}

/// Renders a `list` response.
pub fn render_list(
    out: &mut dyn Write,
    descriptor: &ResourceDescriptor,
    document: &Document,
    options: OutputOptions,
) -> Result<()> {
    if options.sparse {
        return write_json(out, &sparse::echo(document));
    }

    let rows = descriptor.list_projector().project_document(document);
    if options.json {
        let rows: Vec<Row> = rows
            .iter()
            .map(|row| omit_if(row, options.omit_null))
            .collect();
        return write_json(out, &rows);
    }

    if rows.is_empty() {
        writeln!(out, "{}", descriptor.empty_message())?;
        return Ok(());
    }

    let headers: Vec<&str> = descriptor.list_projector().columns().collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|(_, cell)| cell_text(cell)).collect())
        .collect();
    write_table(out, &headers, &cells)
}

/// Renders a `show` response.
pub fn render_detail(
    out: &mut dyn Write,
    descriptor: &ResourceDescriptor,
    document: &Document,
    options: OutputOptions,
) -> Result<()> {
    if options.sparse {
        return write_json(out, &sparse::echo(document));
    }

    let Some(resource) = document.resources().first() else {
        return Err(Error::new(
            ErrorKind::MalformedResponse,
            "response has no primary resource",
        ));
    };
    let row = descriptor
        .detail_projector()
        .project(resource, document.included());

    if options.json {
        return write_json(out, &omit_if(&row, options.omit_null));
    }

    for (label, cell) in row.iter() {
        if is_empty_cell(cell) {
            continue;
        }
        writeln!(out, "{}: {}", label, cell_text(cell))?;
    }
    Ok(())
}

/// Writes pretty-printed JSON followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| Error::internal(format!("failed to format JSON: {}", e)))?;
    writeln!(out, "{}", text)?;
    Ok(())
}

/// Writes left-aligned columns separated by two spaces, with upper-case
/// headers and cells cut at [`MAX_CELL_WIDTH`].
pub fn write_table(out: &mut dyn Write, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_uppercase()).collect();
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| truncate(cell, MAX_CELL_WIDTH)).collect())
        .collect();

    let mut widths: Vec<usize> = header_cells.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    write_line(out, &header_cells, &widths)?;
    for row in &rows {
        write_line(out, row, &widths)?;
    }
    Ok(())
}

fn write_line(out: &mut dyn Write, cells: &[String], widths: &[usize]) -> Result<()> {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    writeln!(out, "{}", padded.join("  ").trim_end())?;
    Ok(())
}

/// Cuts `value` to at most `max` characters, ending in `...` when cut.
pub fn truncate(value: &str, max: usize) -> String {
    let value = value.replace(['\n', '\r'], " ");
    if value.chars().count() <= max {
        return value;
    }
    if max <= 3 {
        return value.chars().take(max).collect();
    }
    let mut cut: String = value.chars().take(max - 3).collect();
    cut.push_str("...");
    cut
}

fn omit_if(row: &Row, omit_null: bool) -> Row {
    if omit_null {
        row.without_empty()
    } else {
        row.clone()
    }
}
