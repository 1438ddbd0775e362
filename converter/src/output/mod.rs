//! Writers for the converted and merged files, and the stdout previews.

use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{OutputError, OutputResult};
use crate::loader::MergedTable;
use crate::models::{OUTPUT_COLUMNS, REQUIRED_COLUMNS};
use crate::transform::ConvertedTable;

/// Write a header row then one line per row.
///
/// The header is written explicitly so that an empty table still yields a
/// valid file.
pub fn write_csv<W: Write, T: Serialize>(
    writer: W,
    header: &[&str],
    rows: &[T],
) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_file<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let write_error = |message: String| OutputError::Write {
        path: path.to_path_buf(),
        message,
    };

    let file = fs::File::create(path).map_err(|e| write_error(e.to_string()))?;
    write_csv(file, header, rows).map_err(|e| write_error(e.to_string()))
}

/// Write the Cryptact custom file, creating its directory if needed.
pub fn write_converted(table: &ConvertedTable, path: &Path) -> OutputResult<()> {
    write_file(path, &OUTPUT_COLUMNS, &table.records)
}

/// Write the merged table with the export column names.
pub fn write_merged(table: &MergedTable, path: &Path) -> OutputResult<()> {
    write_file(path, &REQUIRED_COLUMNS, &table.records)
}

/// Render the first `limit` rows as an aligned text table with a row index.
pub fn render_preview<I>(headers: &[&str], rows: I, limit: usize) -> String
where
    I: IntoIterator<Item = Vec<String>>,
{
    let rows: Vec<Vec<String>> = rows.into_iter().take(limit).collect();

    let index_width = rows.len().saturating_sub(1).to_string().len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let pad = |text: &str, width: usize| {
        let fill = width.saturating_sub(text.chars().count());
        format!("{}{}", " ".repeat(fill), text)
    };

    let mut out = String::new();
    out.push_str(&" ".repeat(index_width));
    for (header, width) in headers.iter().zip(&widths) {
        out.push_str("  ");
        out.push_str(&pad(*header, *width));
    }

    for (i, row) in rows.iter().enumerate() {
        out.push('\n');
        out.push_str(&pad(i.to_string().as_str(), index_width));
        for (cell, width) in row.iter().zip(&widths) {
            out.push_str("  ");
            out.push_str(&pad(cell.as_str(), *width));
        }
    }

    out
}

/// First rows of the merged table.
pub fn preview_merged(table: &MergedTable, limit: usize) -> String {
    render_preview(
        &REQUIRED_COLUMNS,
        table.records.iter().map(|r| r.cells()),
        limit,
    )
}

/// First rows of the converted table.
pub fn preview_converted(table: &ConvertedTable, limit: usize) -> String {
    render_preview(
        &OUTPUT_COLUMNS,
        table.records.iter().map(|r| r.cells()),
        limit,
    )
}

/// First values of the `Action` column.
pub fn preview_actions(table: &ConvertedTable, limit: usize) -> String {
    render_preview(
        &["Action"],
        table.records.iter().map(|r| vec![r.action.to_string()]),
        limit,
    )
}
