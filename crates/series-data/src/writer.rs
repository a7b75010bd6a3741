//! CSV persistence for wide tables.
//!
//! One header row (`date,year,month,<series titles...>`) followed by one row
//! per month. Absent values are written as empty fields.

use std::fs;
use std::io::Write;
use std::path::Path;

use series_core::error::{ExtractError, Result};
use series_core::formatting::format_value;
use series_core::models::WideTable;
use series_core::time_utils::format_iso_date;
use tracing::debug;

/// Serialize `table` as CSV into `writer`.
pub fn write_table<W: Write>(table: &WideTable, writer: W) -> csv::Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(table.header())?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(3 + row.values.len());
        record.push(format_iso_date(row.date));
        record.push(row.year.to_string());
        record.push(row.month.to_string());
        record.extend(row.values.iter().map(|v| format_value(*v)));
        out.write_record(&record)?;
    }

    out.flush()?;
    Ok(())
}

/// Write `table` to `path`, creating parent directories as needed.
pub fn write_csv(table: &WideTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| table_write_error(path, e))?;
    }

    let file = fs::File::create(path).map_err(|e| table_write_error(path, e))?;
    write_table(table, file).map_err(|e| table_write_error(path, e))?;

    debug!(
        "Wrote {} rows x {} series to {}",
        table.rows.len(),
        table.columns.len(),
        path.display()
    );
    Ok(())
}

fn table_write_error(path: &Path, err: impl std::fmt::Display) -> ExtractError {
    ExtractError::TableWrite {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use series_core::models::WideRow;
    use series_core::time_utils::month_end;
    use tempfile::TempDir;

    fn sample_table() -> WideTable {
        WideTable {
            columns: vec!["Zinc".to_string(), "Total, FOB".to_string()],
            rows: vec![
                WideRow {
                    date: month_end(2020, 1).unwrap(),
                    year: 2020,
                    month: 1,
                    values: vec![Some(10.0), None],
                },
                WideRow {
                    date: month_end(2020, 2).unwrap(),
                    year: 2020,
                    month: 2,
                    values: vec![Some(1234.5678), Some(0.0)],
                },
            ],
        }
    }

    #[test]
    fn test_write_table_layout() {
        let mut buf = Vec::new();
        write_table(&sample_table(), &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");

        assert_eq!(
            text,
            "date,year,month,Zinc,\"Total, FOB\"\n\
             2020-01-31,2020,1,10,\n\
             2020-02-29,2020,2,1234.5678,0\n"
        );
    }

    #[test]
    fn test_write_table_empty_rows_has_header() {
        let table = WideTable {
            columns: vec!["A".to_string()],
            rows: Vec::new(),
        };
        let mut buf = Vec::new();
        write_table(&table, &mut buf).expect("write");
        assert_eq!(String::from_utf8(buf).unwrap(), "date,year,month,A\n");
    }

    #[test]
    fn test_write_csv_creates_parent_dirs() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("macro").join("clean").join("exports.csv");

        write_csv(&sample_table(), &path).expect("write csv");

        let content = std::fs::read_to_string(&path).expect("read back");
        assert!(content.starts_with("date,year,month,Zinc"));
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_write_csv_unwritable_target() {
        let tmp = TempDir::new().expect("tempdir");
        // A directory where the file should go.
        let path = tmp.path().join("exports.csv");
        std::fs::create_dir(&path).expect("mkdir");

        let err = write_csv(&sample_table(), &path).unwrap_err();
        assert!(matches!(err, ExtractError::TableWrite { .. }));
    }
}
