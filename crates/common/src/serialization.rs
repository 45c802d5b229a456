//! Serialization utilities.
//!
//! Fixed-precision float formatting shared by every table writer, so that two
//! runs over the same inputs print byte-identical values.

/// Format a float with a fixed number of fractional digits.
///
/// Negative zero is printed as zero.
///
/// # Examples
///
/// ```
/// use solverbench_common::serialization::format_float;
///
/// assert_eq!(format_float(2.0 / 3.0, 3), "0.667");
/// assert_eq!(format_float(-0.0, 2), "0.00");
/// ```
pub fn format_float(value: f64, precision: usize) -> String {
    let formatted = format!("{:.*}", precision, value);
    if formatted.starts_with('-') && formatted[1..].chars().all(|c| c == '0' || c == '.') {
        formatted[1..].to_string()
    } else {
        formatted
    }
}

/// Format an optional float, printing absent values as an empty string.
pub fn format_optional_float(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format_float(v, precision))
        .unwrap_or_default()
}

/// Format an optional float, printing absent values as the given placeholder.
pub fn format_optional_float_or(value: Option<f64>, precision: usize, placeholder: &str) -> String {
    value
        .map(|v| format_float(v, precision))
        .unwrap_or_else(|| placeholder.to_string())
}
