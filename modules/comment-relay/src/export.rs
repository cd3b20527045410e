//! Spreadsheet export of harvested rows.
//!
//! The sheet layout is fixed: a bold header with [`COLUMNS`] followed by one
//! line per row, whether there are zero rows or thousands. `id` and
//! `parent_id` are numeric cells; a missing `parent_id` is a blank cell.

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use telegram_client::InputFile;

use crate::error::Result;
use crate::row::{CommentRow, COLUMNS};

pub const FILE_NAME: &str = "youtube_comments.xlsx";
pub const SHEET_NAME: &str = "comments";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Excel refuses string cells longer than this many characters.
pub const MAX_CELL_CHARS: usize = 32_767;

/// A finished spreadsheet ready to be uploaded.
#[derive(Debug, Clone)]
pub struct SpreadsheetExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub row_count: usize,
}

impl SpreadsheetExport {
    pub fn caption(&self) -> String {
        caption(self.row_count)
    }

    pub fn into_input_file(self) -> InputFile {
        InputFile {
            file_name: self.file_name,
            mime_type: XLSX_MIME.to_string(),
            bytes: self.bytes,
        }
    }
}

/// Summary sent along with the document.
pub fn caption(row_count: usize) -> String {
    format!(
        "Done ✅\nTotal rows: {row_count}\nColumns: {}",
        COLUMNS.join(", ")
    )
}

/// Build the xlsx workbook for `rows`. CPU-bound; run it off the async workers.
pub fn export(rows: &[CommentRow]) -> Result<SpreadsheetExport> {
    let bytes = write_workbook(rows)?;
    tracing::debug!(rows = rows.len(), size = bytes.len(), "Spreadsheet written");

    Ok(SpreadsheetExport {
        file_name: FILE_NAME.to_string(),
        bytes,
        row_count: rows.len(),
    })
}

fn write_workbook(rows: &[CommentRow]) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let line = index as u32 + 1;
        sheet.write_number(line, 0, row.id as f64)?;
        sheet.write_string(line, 1, clamp_cell(&row.link))?;
        sheet.write_string(line, 2, clamp_cell(&row.username))?;
        sheet.write_string(line, 3, clamp_cell(&row.text))?;
        sheet.write_string(line, 4, clamp_cell(&row.parsed_at_iso()))?;
        sheet.write_string(line, 5, clamp_cell(&row.created_at))?;
        if let Some(parent) = row.parent_id {
            sheet.write_number(line, 6, parent as f64)?;
        }
    }

    sheet.set_column_width(1, 50)?;
    sheet.set_column_width(3, 80)?;

    workbook.save_to_buffer()
}

/// Cut `value` to at most [`MAX_CELL_CHARS`] characters, on a char boundary.
fn clamp_cell(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            tracing::warn!(chars = value.chars().count(), "Cell text truncated");
            &value[..end]
        }
        None => value,
    }
}
