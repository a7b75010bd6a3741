//! Year/month block scanner.
//!
//! Walks a designated column pair top to bottom and groups rows into
//! [`YearBlock`]s: a year anchor followed by the month rows that belong to it.

use series_core::cell::CellClassifier;
use series_core::models::{CellValue, Grid, Month, MonthRow, YearBlock};
use tracing::{debug, warn};

/// A block holding more month rows than this has lost sync with the layout.
pub const MAX_MONTHS_PER_BLOCK: usize = 12;

// ── ScanState ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
enum ScanState {
    SeekingYear,
    CollectingMonths(YearBlock),
}

// ── YearMonthScanner ──────────────────────────────────────────────────────────

/// Scans a grid for year anchors and their month rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonthScanner {
    /// Zero-based first row to inspect.
    start_row: usize,
    year_col: usize,
    /// May equal `year_col` in single-column layouts.
    month_col: usize,
}

impl YearMonthScanner {
    /// Create a scanner starting at the 1-indexed spreadsheet row `start_row`.
    pub fn new(start_row: usize, year_col: usize, month_col: usize) -> Self {
        Self {
            start_row: start_row.saturating_sub(1),
            year_col,
            month_col,
        }
    }

    /// Run the scan to the end of `grid`.
    ///
    /// The state machine:
    /// 1. `SeekingYear` skips rows until the year column holds a year, opens a
    ///    block for it and moves to the next row.
    /// 2. `CollectingMonths` closes the block, without consuming the row, when
    ///    the year column holds a new year and at least one month has been
    ///    collected. A new year seen before any month re-anchors the block.
    /// 3. Rows whose month label does not normalise are skipped.
    /// 4. A December row closes the block; so does a block that grows past
    ///    [`MAX_MONTHS_PER_BLOCK`] rows.
    /// 5. Blocks without month rows are dropped.
    pub fn scan(&self, grid: &Grid) -> Vec<YearBlock> {
        let mut blocks: Vec<YearBlock> = Vec::new();
        let mut state = ScanState::SeekingYear;
        let mut row = self.start_row;

        while row < grid.height() {
            state = match state {
                ScanState::SeekingYear => match CellClassifier::extract_year(self.year_cell(grid, row)) {
                    Some(year) => {
                        let block = YearBlock::new(year, row);
                        row += 1;
                        ScanState::CollectingMonths(block)
                    }
                    None => {
                        row += 1;
                        ScanState::SeekingYear
                    }
                },
                ScanState::CollectingMonths(block) => self.collect_row(grid, &mut row, block, &mut blocks),
            };
        }

        if let ScanState::CollectingMonths(block) = state {
            Self::emit(block, &mut blocks);
        }

        debug!(
            "YearMonthScanner: {} blocks from {} rows (year col {}, month col {})",
            blocks.len(),
            grid.height(),
            self.year_col,
            self.month_col
        );
        blocks
    }

    // ── State helpers ─────────────────────────────────────────────────────────

    fn year_cell<'a>(&self, grid: &'a Grid, row: usize) -> &'a CellValue {
        grid.cell(row, self.year_col)
    }

    /// Handle one row while collecting months for `block`.
    fn collect_row(
        &self,
        grid: &Grid,
        row: &mut usize,
        mut block: YearBlock,
        blocks: &mut Vec<YearBlock>,
    ) -> ScanState {
        if let Some(next_year) = CellClassifier::extract_year(self.year_cell(grid, *row)) {
            if !block.is_empty() {
                // Leave the row in place; it anchors the next block.
                Self::emit(block, blocks);
                return ScanState::SeekingYear;
            }
            debug!(
                "YearMonthScanner: anchor {} at row {} has no months, re-anchoring at {} (row {})",
                block.year, block.anchor_row, next_year, *row
            );
            let reanchored = YearBlock::new(next_year, *row);
            *row += 1;
            return ScanState::CollectingMonths(reanchored);
        }

        let label = grid.cell(*row, self.month_col);
        let Some(month) = CellClassifier::normalize_month_label(label) else {
            *row += 1;
            return ScanState::CollectingMonths(block);
        };

        block.months.push(MonthRow { row: *row, month });
        *row += 1;

        if month == Month::December {
            Self::emit(block, blocks);
            return ScanState::SeekingYear;
        }
        if block.len() > MAX_MONTHS_PER_BLOCK {
            warn!(
                "YearMonthScanner: year {} at row {} collected {} month rows, closing block early",
                block.year,
                block.anchor_row,
                block.len()
            );
            Self::emit(block, blocks);
            return ScanState::SeekingYear;
        }
        ScanState::CollectingMonths(block)
    }

    /// Push `block` unless it is empty.
    fn emit(block: YearBlock, blocks: &mut Vec<YearBlock>) {
        if block.is_empty() {
            debug!(
                "YearMonthScanner: discarding anchor {} at row {} with no month rows",
                block.year, block.anchor_row
            );
            return;
        }
        blocks.push(block);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
