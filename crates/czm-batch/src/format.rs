//! General-format number rendering
//!
//! Renders floating-point values the way C's `%g` conversion does: a fixed
//! number of significant digits, trailing zeros removed, and scientific
//! notation once the decimal exponent leaves `[-4, precision)`.

/// Significant digits used for every stiffness value written to disk
pub const SIGNIFICANT_DIGITS: usize = 6;

/// Render `value` with [`SIGNIFICANT_DIGITS`] significant digits
#[inline]
#[must_use]
pub fn general(value: f64) -> String {
    general_with_precision(value, SIGNIFICANT_DIGITS)
}

/// Render `value` in general format with `precision` significant digits
///
/// A precision of zero is treated as one.
#[must_use]
pub fn general_with_precision(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        let text = if value.is_sign_negative() { "-inf" } else { "inf" };
        return text.to_string();
    }

    let precision = precision.max(1);

    // Exponent after rounding to `precision` digits decides the notation.
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= precision as i32 {
        let mantissa = strip_fraction_zeros(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        strip_fraction_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn strip_fraction_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
