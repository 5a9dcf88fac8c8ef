//! Spreadsheet reading with calamine.
//!
//! Only the first worksheet is read. Its first row is the header; every
//! following non-blank row becomes a [`SheetRow`] keyed by header name.

use std::path::Path;

use calamine::{open_workbook_auto, DataType, Range, Reader};
use tracing::{debug, warn};

use crate::error::SheetError;

/// One data row of a worksheet, as ordered `(column, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    cells: Vec<(String, String)>,
}

impl SheetRow {
    /// Build a row from `(column, value)` pairs.
    pub fn from_cells(cells: Vec<(String, String)>) -> Self {
        Self { cells }
    }

    /// Value of the first column called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value.as_str())
    }

    /// Column names in sheet order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(column, _)| column.as_str())
    }

    /// True when every cell is empty.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Read the data rows of the first worksheet in `path`.
pub fn read_rows(path: &Path) -> Result<Vec<SheetRow>, SheetError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| SheetError::Open(format!("{}: {}", path.display(), e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::NoSheets)?;

    let range = match workbook.worksheet_range(&sheet_name) {
        Some(Ok(range)) => range,
        Some(Err(e)) => {
            return Err(SheetError::Range {
                sheet: sheet_name,
                reason: e.to_string(),
            })
        }
        None => {
            return Err(SheetError::Range {
                sheet: sheet_name,
                reason: "worksheet not found".to_string(),
            })
        }
    };

    let rows = rows_from_range(&range);
    debug!("Sheet {:?}: {} data rows", sheet_name, rows.len());
    Ok(rows)
}

/// Convert a cell range into header-keyed rows.
pub fn rows_from_range(range: &Range<DataType>) -> Vec<SheetRow> {
    let mut grid = range.rows();

    let header: Vec<String> = match grid.next() {
        Some(cells) => cells.iter().map(|c| render_cell(c).trim().to_string()).collect(),
        None => return Vec::new(),
    };

    let mut rows = Vec::new();
    for (index, cells) in grid.enumerate() {
        let row = SheetRow::from_cells(
            header
                .iter()
                .enumerate()
                .map(|(col, name)| {
                    let value = cells.get(col).map(render_cell).unwrap_or_default();
                    (name.clone(), value)
                })
                .collect(),
        );

        if row.is_blank() {
            debug!("Skipping blank row {}", index + 2);
            continue;
        }
        rows.push(row);
    }

    rows
}

/// Render a cell as text.
///
/// Dates come out as `YYYY-MM-DD`; empty cells as an empty string.
pub fn render_cell(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Float(v) => v.to_string(),
        DataType::Int(v) => v.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => String::new(),
        DataType::DateTime(v) => match cell.as_date() {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => {
                warn!("Unrepresentable date serial {}", v);
                v.to_string()
            }
        },
        DataType::DateTimeIso(s) => s.clone(),
        DataType::Duration(v) => v.to_string(),
        DataType::DurationIso(s) => s.clone(),
        DataType::Error(e) => format!("#{:?}", e),
    }
}
