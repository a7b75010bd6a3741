use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Cells and grids ───────────────────────────────────────────────────────────

/// A single raw spreadsheet cell as handed over by the grid loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    /// No content at all.
    #[default]
    Empty,
    /// A native numeric cell.
    Number(f64),
    /// A text cell, untrimmed.
    Text(String),
}

impl CellValue {
    /// Convenience constructor for text cells.
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// `true` for [`CellValue::Empty`] and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(n) => n.is_nan(),
            CellValue::Text(s) => s.trim().is_empty(),
        }
    }

    /// Render the cell the way a header fragment reads.
    ///
    /// Integral numbers print without a fractional part, so a header cell
    /// holding `2016.0` reads as `"2016"`.
    pub fn as_display_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(n) if n.is_nan() => None,
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            CellValue::Text(s) => Some(s.clone()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// An immutable, rectangular, zero-indexed grid of raw cells.
///
/// Ragged input rows are padded with [`CellValue::Empty`] on construction.
/// Reads outside the grid return an empty cell instead of panicking, so a
/// layout that names a column the sheet does not have simply yields no data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Grid {
    /// Build a grid from row-major cells.
    pub fn new(mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        Self { rows, width }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// `true` when the grid holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The cell at zero-based `(row, col)`, or an empty cell when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

// ── Months ────────────────────────────────────────────────────────────────────

/// Calendar month, numbered 1–12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January = 1,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Month number, 1 for January through 12 for December.
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Three-letter Spanish abbreviation used in bulletin row labels.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Month::January => "ENE",
            Month::February => "FEB",
            Month::March => "MAR",
            Month::April => "ABR",
            Month::May => "MAY",
            Month::June => "JUN",
            Month::July => "JUL",
            Month::August => "AGO",
            Month::September => "SEP",
            Month::October => "OCT",
            Month::November => "NOV",
            Month::December => "DIC",
        }
    }

    /// Full Spanish month name, uppercased.
    pub fn full_name(self) -> &'static str {
        match self {
            Month::January => "ENERO",
            Month::February => "FEBRERO",
            Month::March => "MARZO",
            Month::April => "ABRIL",
            Month::May => "MAYO",
            Month::June => "JUNIO",
            Month::July => "JULIO",
            Month::August => "AGOSTO",
            Month::September => "SEPTIEMBRE",
            Month::October => "OCTUBRE",
            Month::November => "NOVIEMBRE",
            Month::December => "DICIEMBRE",
        }
    }
}

// ── Scanner output ────────────────────────────────────────────────────────────

/// One month row found under a year anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRow {
    /// Zero-based grid row.
    pub row: usize,
    pub month: Month,
}

/// A year anchor plus the month rows that follow it.
///
/// Months need not be contiguous or complete. Blocks with no month rows are
/// never emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearBlock {
    /// Zero-based grid row of the anchor cell.
    pub anchor_row: usize,
    pub year: i32,
    pub months: Vec<MonthRow>,
}

impl YearBlock {
    /// Open an empty block at `anchor_row`.
    pub fn new(year: i32, anchor_row: usize) -> Self {
        Self {
            anchor_row,
            year,
            months: Vec::new(),
        }
    }

    /// Number of month rows collected so far.
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// `true` when no month row has been collected.
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

// ── Long-format series ────────────────────────────────────────────────────────

/// One `(year, month, value)` observation of a single source column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub year: i32,
    /// Month number, 1–12.
    pub month: u32,
    /// `None` when the cell held no usable number.
    pub value: Option<f64>,
}

/// A titled long-format series extracted from one value column.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Zero-based source column.
    pub column: usize,
    pub title: String,
    pub records: Vec<SeriesRecord>,
}

// ── Wide table ────────────────────────────────────────────────────────────────

/// One dated row of the joined table.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    /// Last calendar day of `(year, month)`.
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    /// One slot per entry of [`WideTable::columns`]; `None` is absent, never zero.
    pub values: Vec<Option<f64>>,
}

/// The joined `(date, year, month, series...)` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    /// Series titles, in output order.
    pub columns: Vec<String>,
    pub rows: Vec<WideRow>,
}

impl WideTable {
    /// Key columns that precede every series column in the output.
    pub const KEY_COLUMNS: [&'static str; 3] = ["date", "year", "month"];

    /// Full ordered header: key columns followed by series titles.
    pub fn header(&self) -> Vec<String> {
        Self::KEY_COLUMNS
            .iter()
            .map(|s| s.to_string())
            .chain(self.columns.iter().cloned())
            .collect()
    }

    /// Position of the series titled `title`.
    pub fn column_index(&self, title: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == title)
    }

    /// Iterate the values of one series column.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.rows
            .iter()
            .map(move |r| r.values.get(idx).copied().flatten())
    }

    /// Value of `title` in the row for `(year, month)`.
    pub fn value(&self, year: i32, month: u32, title: &str) -> Option<f64> {
        let idx = self.column_index(title)?;
        self.rows
            .iter()
            .find(|r| r.year == year && r.month == month)
            .and_then(|r| r.values.get(idx).copied().flatten())
    }

    /// `true` when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Grid ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_grid_pads_ragged_rows() {
        let grid = Grid::new(vec![
            vec![CellValue::from("a")],
            vec![CellValue::from(1.0), CellValue::from(2.0), CellValue::from(3.0)],
        ]);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.cell(0, 2), &CellValue::Empty);
    }

    #[test]
    fn test_grid_out_of_range_is_empty() {
        let grid = Grid::new(vec![vec![CellValue::from(1.0)]]);
        assert_eq!(grid.cell(5, 0), &CellValue::Empty);
        assert_eq!(grid.cell(0, 9), &CellValue::Empty);
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::new(vec![]);
        assert!(grid.is_empty());
        assert_eq!(grid.width(), 0);
    }

    // ── CellValue ─────────────────────────────────────────────────────────────

    #[test]
    fn test_cell_display_text_integral_number() {
        assert_eq!(CellValue::Number(2016.0).as_display_text().as_deref(), Some("2016"));
        assert_eq!(CellValue::Number(1.5).as_display_text().as_deref(), Some("1.5"));
        assert_eq!(CellValue::Empty.as_display_text(), None);
    }

    #[test]
    fn test_cell_is_blank() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::text("   ").is_blank());
        assert!(CellValue::Number(f64::NAN).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_cell_from_empty_str_is_empty() {
        assert_eq!(CellValue::from(""), CellValue::Empty);
    }

    // ── Month ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_month_numbers_in_calendar_order() {
        let numbers: Vec<u32> = Month::ALL.iter().map(|m| m.number()).collect();
        assert_eq!(numbers, (1..=12).collect::<Vec<u32>>());
    }

    #[test]
    fn test_month_abbreviation() {
        assert_eq!(Month::January.abbreviation(), "ENE");
        assert_eq!(Month::August.abbreviation(), "AGO");
        assert_eq!(Month::December.abbreviation(), "DIC");
        assert_eq!(Month::September.full_name(), "SEPTIEMBRE");
    }

    // ── WideTable ─────────────────────────────────────────────────────────────

    #[test]
    fn test_wide_table_header_and_lookup() {
        let table = WideTable {
            columns: vec!["FOB".to_string()],
            rows: vec![WideRow {
                date: NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
                year: 2020,
                month: 1,
                values: vec![Some(12.5)],
            }],
        };
        assert_eq!(table.header(), vec!["date", "year", "month", "FOB"]);
        assert_eq!(table.value(2020, 1, "FOB"), Some(12.5));
        assert_eq!(table.value(2020, 2, "FOB"), None);
        assert_eq!(table.value(2020, 1, "CIF"), None);
    }
}
