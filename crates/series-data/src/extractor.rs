//! Long-format series extraction for a single value column.

use std::collections::HashSet;

use series_core::cell::CellClassifier;
use series_core::models::{Grid, SeriesRecord, YearBlock};
use tracing::debug;

use crate::scanner::YearMonthScanner;

/// Turns one value column into `(year, month, value)` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesExtractor {
    scanner: YearMonthScanner,
}

impl SeriesExtractor {
    /// Create an extractor that locates rows with `scanner`.
    pub fn new(scanner: YearMonthScanner) -> Self {
        Self { scanner }
    }

    /// Scan `grid` and read `value_col` at every month row found.
    ///
    /// Returns an empty vector, not an error, when no year block could be
    /// recovered.
    pub fn extract(&self, grid: &Grid, value_col: usize) -> Vec<SeriesRecord> {
        let blocks = self.scanner.scan(grid);
        Self::records_from_blocks(&blocks, grid, value_col)
    }

    /// Read `value_col` at the month rows of already-scanned `blocks`.
    ///
    /// Block positions do not depend on the value column, so a caller
    /// extracting many columns of one grid can scan once and reuse the blocks.
    /// Cells that do not coerce to a number give `value: None`. Only the first
    /// record for a given `(year, month)` is kept.
    pub fn records_from_blocks(blocks: &[YearBlock], grid: &Grid, value_col: usize) -> Vec<SeriesRecord> {
        let mut seen: HashSet<(i32, u32)> = HashSet::new();
        let mut records = Vec::new();

        for block in blocks {
            for month_row in &block.months {
                let key = (block.year, month_row.month.number());
                if !seen.insert(key) {
                    debug!(
                        "SeriesExtractor: duplicate {}-{:02} at row {} in column {}, keeping first",
                        key.0, key.1, month_row.row, value_col
                    );
                    continue;
                }
                records.push(SeriesRecord {
                    year: block.year,
                    month: key.1,
                    value: CellClassifier::coerce_numeric(grid.cell(month_row.row, value_col)),
                });
            }
        }

        records
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
