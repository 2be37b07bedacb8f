//! Number parsing and display formatting.
//!
//! Operands are kept as canonical decimal text. These helpers convert that
//! text to and from `f64`, and render it for display with thousands
//! separators. None of them fail: text that is not a number passes through
//! unchanged so a degraded value still has something to show.

/// Parse operand text as a finite-or-infinite number.
///
/// Returns `None` for empty or malformed text, and for text that parses to
/// NaN, so that callers treat "NaN" as "not computable".
///
/// # Example
///
/// ```rust
/// use keycalc::core::parse_operand;
///
/// assert_eq!(parse_operand("12.5"), Some(12.5));
/// assert_eq!(parse_operand("0."), Some(0.0));
/// assert_eq!(parse_operand(""), None);
/// assert_eq!(parse_operand("Error"), None);
/// assert_eq!(parse_operand("Infinity"), Some(f64::INFINITY));
/// ```
pub fn parse_operand(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| !value.is_nan())
}

/// Render a computed number as canonical decimal text.
///
/// No rounding is applied. Infinities and NaN use the spellings
/// `Infinity`, `-Infinity` and `NaN`; negative zero is written `0`.
///
/// # Example
///
/// ```rust
/// use keycalc::core::format_number;
///
/// assert_eq!(format_number(20.0), "20");
/// assert_eq!(format_number(0.25), "0.25");
/// assert_eq!(format_number(-0.0), "0");
/// assert_eq!(format_number(f64::INFINITY), "Infinity");
/// ```
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Format operand text for display with `,` thousands separators.
///
/// Only the integer part is grouped; the fractional part is kept exactly as
/// typed so trailing zeros and a dangling `.` stay visible while entering a
/// number. Text that is not a plain decimal is returned unchanged.
///
/// # Example
///
/// ```rust
/// use keycalc::core::format_operand;
///
/// assert_eq!(format_operand("1234567"), "1,234,567");
/// assert_eq!(format_operand("-1234.50"), "-1,234.50");
/// assert_eq!(format_operand("0."), "0.");
/// assert_eq!(format_operand("Infinity"), "Infinity");
/// ```
pub fn format_operand(text: &str) -> String {
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text, None),
    };

    let (sign, digits) = match integer.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer),
    };

    let plain = digits.chars().all(|c| c.is_ascii_digit())
        && fraction.is_none_or(|f| f.chars().all(|c| c.is_ascii_digit()));
    if text.is_empty() || !plain || (digits.is_empty() && fraction.is_none()) {
        return text.to_string();
    }

    let grouped = if digits.is_empty() {
        "0".to_string()
    } else {
        group_thousands(digits)
    };

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
