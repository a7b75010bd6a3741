/// Render an optional series value as a CSV field.
///
/// Absent values become an empty field; present values keep their full
/// precision using the shortest representation that round-trips.
///
/// # Examples
///
/// ```
/// use series_core::formatting::format_value;
///
/// assert_eq!(format_value(None), "");
/// assert_eq!(format_value(Some(10.0)), "10");
/// assert_eq!(format_value(Some(1234.5678)), "1234.5678");
/// assert_eq!(format_value(Some(0.0)), "0");
/// ```
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => String::new(),
    }
}

/// Join series titles into a compact, bulleted list for log output.
///
/// # Examples
///
/// ```
/// use series_core::formatting::format_series_list;
///
/// let titles = vec!["FOB".to_string(), "Zinc".to_string()];
/// assert_eq!(format_series_list(&titles), " - FOB\n - Zinc");
/// ```
pub fn format_series_list(titles: &[String]) -> String {
    titles
        .iter()
        .map(|t| format!(" - {}", t))
        .collect::<Vec<_>>()
        .join("\n")
}
