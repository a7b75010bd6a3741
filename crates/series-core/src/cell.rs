//! Classification of single raw cells: year anchors, month labels and numbers.
//!
//! Every function here is total. A cell that does not fit a category yields
//! `false` or `None`; nothing in this module returns an error, because gaps
//! and footnote rows are ordinary in the source workbooks.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::{CellValue, Month};

/// Inclusive window of years accepted as anchors.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2099;

fn year_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(19|20)\d{2}").expect("regex is valid"))
}

fn parenthetical_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\(.*?\)").expect("regex is valid"))
}

// ── CellClassifier ────────────────────────────────────────────────────────────

/// Stateless helper that decides what a single raw cell denotes.
pub struct CellClassifier;

impl CellClassifier {
    /// `true` when [`CellClassifier::extract_year`] would return a year.
    pub fn is_year(cell: &CellValue) -> bool {
        Self::extract_year(cell).is_some()
    }

    /// Pull a year in `1900..=2099` out of `cell`.
    ///
    /// * Numbers are rounded to the nearest integer.
    /// * Text yields its first `19xx`/`20xx` digit run.
    /// * Empty and blank cells never hold a year.
    pub fn extract_year(cell: &CellValue) -> Option<i32> {
        if cell.is_blank() {
            return None;
        }
        let year = match cell {
            CellValue::Empty => None,
            CellValue::Number(n) if !n.is_finite() => None,
            CellValue::Number(n) => {
                let rounded = n.round();
                // Bounds-check in float space before narrowing.
                (f64::from(*YEAR_RANGE.start())..=f64::from(*YEAR_RANGE.end()))
                    .contains(&rounded)
                    .then_some(rounded as i32)
            }
            CellValue::Text(s) => year_regex()
                .find(s.trim())
                .and_then(|m| m.as_str().parse::<i32>().ok()),
        };
        year.filter(|y| YEAR_RANGE.contains(y))
    }

    /// Map a month row label to a [`Month`].
    ///
    /// Only text cells qualify. The label is trimmed and uppercased, and any
    /// parenthesised annotation such as `(p)` is dropped, so `"Dic (p)"` and
    /// `"DIC"` both give December.
    pub fn normalize_month_label(cell: &CellValue) -> Option<Month> {
        let CellValue::Text(raw) = cell else {
            return None;
        };
        let upper = raw.trim().to_uppercase();
        let stripped = parenthetical_regex().replace_all(&upper, "");
        month_from_label(stripped.trim())
    }

    /// Coerce a cell to a finite number.
    ///
    /// Native numbers pass through. Text may use either `.` or `,` as the
    /// decimal mark, with the other one (or a repeated one) as grouping.
    /// Anything unparseable yields `None`.
    pub fn coerce_numeric(cell: &CellValue) -> Option<f64> {
        match cell {
            CellValue::Empty => None,
            CellValue::Number(n) => n.is_finite().then_some(*n),
            CellValue::Text(s) => parse_numeric_text(s),
        }
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn month_from_label(label: &str) -> Option<Month> {
    // Regional spelling of September.
    if label == "SETIEMBRE" {
        return Some(Month::September);
    }
    Month::ALL
        .into_iter()
        .find(|m| label == m.abbreviation() || label == m.full_name())
}

fn parse_numeric_text(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    let (negative, digits) = if let Some(rest) = cleaned.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = cleaned.strip_prefix('+') {
        (false, rest)
    } else {
        (false, cleaned.as_str())
    };

    if digits.is_empty()
        || !digits.chars().any(|c| c.is_ascii_digit())
        || !digits
            .chars()
            .all(|c| c.is_ascii_digit() || c == ',' || c == '.')
    {
        return None;
    }

    let normalized = match (digits.rfind(','), digits.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => digits.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => digits.replace(',', ""),
        (Some(_), None) if digits.matches(',').count() > 1 => digits.replace(',', ""),
        (Some(_), None) => digits.replace(',', "."),
        (None, Some(_)) if digits.matches('.').count() > 1 => digits.replace('.', ""),
        _ => digits.to_string(),
    };

    let value = normalized.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if negative { -value } else { value })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::text(s)
    }

    // ── extract_year / is_year ────────────────────────────────────────────────

    #[test]
    fn test_extract_year_from_integer_float_and_text() {
        for year in [1900, 1985, 2020, 2099] {
            assert_eq!(CellClassifier::extract_year(&CellValue::Number(f64::from(year))), Some(year));
            assert_eq!(
                CellClassifier::extract_year(&CellValue::Number(f64::from(year) + 0.2)),
                Some(year)
            );
            assert_eq!(CellClassifier::extract_year(&text(&year.to_string())), Some(year));
            assert_eq!(
                CellClassifier::extract_year(&text(&format!("Año {year} (p)"))),
                Some(year)
            );
        }
    }

    #[test]
    fn test_extract_year_outside_window() {
        assert_eq!(CellClassifier::extract_year(&CellValue::Number(1899.0)), None);
        assert_eq!(CellClassifier::extract_year(&CellValue::Number(2100.0)), None);
        assert_eq!(CellClassifier::extract_year(&text("1899")), None);
        assert_eq!(CellClassifier::extract_year(&text("2100")), None);
    }

    #[test]
    fn test_extract_year_rounds_floats() {
        assert_eq!(CellClassifier::extract_year(&CellValue::Number(2019.6)), Some(2020));
        assert_eq!(CellClassifier::extract_year(&CellValue::Number(2099.4)), Some(2099));
        assert_eq!(CellClassifier::extract_year(&CellValue::Number(2099.5)), None);
    }

    #[test]
    fn test_extract_year_blank_and_empty() {
        assert_eq!(CellClassifier::extract_year(&CellValue::Empty), None);
        assert_eq!(CellClassifier::extract_year(&text("   ")), None);
        assert_eq!(CellClassifier::extract_year(&CellValue::Number(f64::NAN)), None);
        assert!(!CellClassifier::is_year(&text("ENE")));
    }

    #[test]
    fn test_is_year_agrees_with_extract_year() {
        let cells = [
            CellValue::Number(1900.0),
            CellValue::Number(1899.49),
            CellValue::Number(2099.51),
            text("2020"),
            text("Cuadro 19"),
            text("Total"),
            CellValue::Empty,
        ];
        for cell in &cells {
            assert_eq!(
                CellClassifier::is_year(cell),
                CellClassifier::extract_year(cell).is_some(),
                "drift for {cell:?}"
            );
        }
    }

    // ── normalize_month_label ─────────────────────────────────────────────────

    #[test]
    fn test_month_label_case_insensitive_with_annotation() {
        assert_eq!(CellClassifier::normalize_month_label(&text("Dic (p)")), Some(Month::December));
        assert_eq!(CellClassifier::normalize_month_label(&text("DIC")), Some(Month::December));
        assert_eq!(CellClassifier::normalize_month_label(&text("  ene ")), Some(Month::January));
        assert_eq!(CellClassifier::normalize_month_label(&text("Ago(1)")), Some(Month::August));
    }

    #[test]
    fn test_month_label_full_names() {
        assert_eq!(CellClassifier::normalize_month_label(&text("Marzo")), Some(Month::March));
        assert_eq!(CellClassifier::normalize_month_label(&text("SETIEMBRE")), Some(Month::September));
        for m in Month::ALL {
            assert_eq!(CellClassifier::normalize_month_label(&text(m.abbreviation())), Some(m));
            assert_eq!(CellClassifier::normalize_month_label(&text(m.full_name())), Some(m));
        }
    }

    #[test]
    fn test_month_label_rejects_non_text_and_unknown() {
        assert_eq!(CellClassifier::normalize_month_label(&CellValue::Number(1.0)), None);
        assert_eq!(CellClassifier::normalize_month_label(&CellValue::Empty), None);
        assert_eq!(CellClassifier::normalize_month_label(&text("Fuente: BCB")), None);
        assert_eq!(CellClassifier::normalize_month_label(&text("JAN")), None);
    }

    // ── coerce_numeric ────────────────────────────────────────────────────────

    #[test]
    fn test_coerce_numeric_native_number() {
        assert_eq!(CellClassifier::coerce_numeric(&CellValue::Number(10.5)), Some(10.5));
        assert_eq!(CellClassifier::coerce_numeric(&CellValue::Number(0.0)), Some(0.0));
        assert_eq!(CellClassifier::coerce_numeric(&CellValue::Number(f64::NAN)), None);
        assert_eq!(CellClassifier::coerce_numeric(&CellValue::Number(f64::INFINITY)), None);
    }

    #[test]
    fn test_coerce_numeric_separators() {
        assert_eq!(CellClassifier::coerce_numeric(&text("1.234,5")), Some(1234.5));
        assert_eq!(CellClassifier::coerce_numeric(&text("1,234.5")), Some(1234.5));
        assert_eq!(CellClassifier::coerce_numeric(&text("12,5")), Some(12.5));
        assert_eq!(CellClassifier::coerce_numeric(&text("1.234.567")), Some(1_234_567.0));
        assert_eq!(CellClassifier::coerce_numeric(&text("1,234,567")), Some(1_234_567.0));
        assert_eq!(CellClassifier::coerce_numeric(&text(" -3.25 ")), Some(-3.25));
        assert_eq!(CellClassifier::coerce_numeric(&text("1\u{a0}234,0")), Some(1234.0));
    }

    #[test]
    fn test_coerce_numeric_gaps_are_absent() {
        for raw in ["", "  ", "-", "n.d.", "...", "(p)", "inf", "NaN", "12%"] {
            assert_eq!(CellClassifier::coerce_numeric(&text(raw)), None, "{raw:?}");
        }
        assert_eq!(CellClassifier::coerce_numeric(&CellValue::Empty), None);
    }
}
