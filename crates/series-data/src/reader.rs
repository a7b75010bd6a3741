//! Grid loading from workbook and CSV files.
//!
//! Converts a worksheet into an immutable [`Grid`] addressed in absolute
//! sheet coordinates, so row and column indices in a report layout match what
//! a person sees in the spreadsheet.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use series_core::error::{ExtractError, Result};
use series_core::models::{CellValue, Grid};
use tracing::debug;

// ── Public API ────────────────────────────────────────────────────────────────

/// Load `path` into a [`Grid`].
///
/// Workbooks (`xlsx`, `xlsm`, `xlsb`, `xls`, `ods`) are read through calamine,
/// taking `sheet` when given and the first worksheet otherwise. CSV files are
/// read without a header row, every non-empty field becoming text.
pub fn load_grid(path: &Path, sheet: Option<&str>) -> Result<Grid> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let grid = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path, sheet)?,
        "csv" => load_csv(path)?,
        _ => return Err(ExtractError::UnsupportedFormat(path.to_path_buf())),
    };

    debug!(
        "Loaded {}x{} grid from {}",
        grid.height(),
        grid.width(),
        path.display()
    );
    Ok(grid)
}

// ── Workbooks ─────────────────────────────────────────────────────────────────

fn load_workbook(path: &Path, sheet: Option<&str>) -> Result<Grid> {
    if !path.exists() {
        return Err(ExtractError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file does not exist"),
        });
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| grid_load_error(path, e))?;

    let sheet_names = workbook.sheet_names();
    let name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| ExtractError::SheetNotFound {
                path: path.to_path_buf(),
                sheet: wanted.to_string(),
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| grid_load_error(path, "workbook contains no sheets"))?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| grid_load_error(path, e))?;

    Ok(range_to_grid(&range))
}

/// Re-base a calamine range onto absolute sheet coordinates.
///
/// calamine trims leading empty rows and columns; padding them back keeps
/// row 0 equal to spreadsheet row 1.
fn range_to_grid(range: &Range<Data>) -> Grid {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; col_offset];
        cells.extend(row.iter().map(data_to_cell));
        rows.push(cells);
    }
    Grid::new(rows)
}

fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::text(if *b { "TRUE" } else { "FALSE" }),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            if s.is_empty() {
                CellValue::Empty
            } else {
                CellValue::text(s.as_str())
            }
        }
    }
}

fn grid_load_error(path: &Path, err: impl std::fmt::Display) -> ExtractError {
    ExtractError::GridLoad {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

fn load_csv(path: &Path) -> Result<Grid> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| grid_load_error(path, e))?;
        rows.push(record.iter().map(CellValue::from).collect());
    }
    Ok(Grid::new(rows))
}

fn csv_error(path: &Path, err: csv::Error) -> ExtractError {
    match err.into_kind() {
        csv::ErrorKind::Io(source) => ExtractError::FileRead {
            path: path.to_path_buf(),
            source,
        },
        other => grid_load_error(path, format!("{other:?}")),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
