//! Fixed-point conversion for scaled attributes.
//!
//! A scale exponent `n` means the wire integer counts units of `10^-n`.
//! Decoded values are rounded to [`SIGNIFICANT_DIGITS`] so binary float
//! noise does not leak into reports, but never to fewer than `n` decimal
//! places: every raw integer up to [`MAX_EXACT_RAW`] survives
//! `to_raw(to_scaled(raw, n), n)`.

/// Significant digits kept when scaling a raw integer.
pub const SIGNIFICANT_DIGITS: i32 = 12;

/// Largest raw magnitude whose scaled value re-encodes exactly (2^48).
pub const MAX_EXACT_RAW: f64 = 281_474_976_710_656.0;

/// Raw wire integer to engineering value: `raw * 10^-exponent`.
///
/// ```
/// use ubxwire_core::codec::to_scaled;
///
/// assert_eq!(to_scaled(-1_234_567_890.0, 7), -123.456789);
/// assert_eq!(to_scaled(98_765_432_109_876.0, 2), 987_654_321_098.76);
/// ```
pub fn to_scaled(raw: f64, exponent: u8) -> f64 {
    let value = raw / pow10(exponent);
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let decimals = significant_decimals(value, SIGNIFICANT_DIGITS).max(i32::from(exponent));
    round_decimals(value, decimals)
}

/// Engineering value to the nearest raw wire integer.
pub fn to_raw(value: f64, exponent: u8) -> f64 {
    (value * pow10(exponent)).round()
}

/// Rounds `value` to `digits` significant decimal digits.
pub fn round_significant(value: f64, digits: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    round_decimals(value, significant_decimals(value, digits))
}

fn significant_decimals(value: f64, digits: i32) -> i32 {
    digits - 1 - value.abs().log10().floor() as i32
}

fn round_decimals(value: f64, decimals: i32) -> f64 {
    if decimals >= 0 {
        let factor = 10f64.powi(decimals);
        let rounded = (value * factor).round() / factor;
        if rounded.is_finite() { rounded } else { value }
    } else {
        let factor = 10f64.powi(-decimals);
        (value / factor).round() * factor
    }
}

fn pow10(exponent: u8) -> f64 {
    10f64.powi(i32::from(exponent))
}
