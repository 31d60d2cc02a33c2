//! Fixed-precision number formatting shared by the engines and the renderers

/// Format with fixed decimals, never printing a negative zero
///
/// ```
/// use statcalc::format::format_value;
///
/// assert_eq!(format_value(-0.00001, 3), "0.000");
/// assert_eq!(format_value(2.5, 2), "2.50");
/// ```
pub fn format_value(value: f64, decimals: usize) -> String {
    let text = format!("{:.prec$}", value, prec = decimals);
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => text,
    }
}
