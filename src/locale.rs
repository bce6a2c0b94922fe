//! Text boundary for parameter inputs.
//!
//! Users type decimals with either a comma or a dot. Everything past this
//! module works on plain `f64`.

use crate::CompassError;

/// Parses a decimal written with `,` or `.` as separator.
///
/// # Errors
/// Returns [`CompassError::InvalidNumber`] for empty, malformed or
/// non-finite input.
pub fn parse_decimal(text: &str) -> Result<f64, CompassError> {
    let normalized = text.trim().replacen(',', ".", 1);
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CompassError::InvalidNumber(text.to_string())),
    }
}

/// Formats a value with a comma separator, e.g. `0,003`.
pub fn format_decimal(value: f64) -> String {
    value.to_string().replacen('.', ",", 1)
}

/// Rounds to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Bounds and stepping of one numeric input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterField {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub decimals: u32,
}

impl ParameterField {
    pub const RHO: ParameterField = ParameterField::new(0.0, 0.01, 0.001);
    pub const TAU: ParameterField = ParameterField::new(0.0, 1.0, 0.1);
    pub const THETA: ParameterField = ParameterField::new(0.0, 1.0, 0.1);
    pub const FEES: ParameterField = ParameterField::new(0.0, 1.0, 0.01);

    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step,
            decimals: 5,
        }
    }

    /// Value to take over while the user is still typing.
    ///
    /// Only in-range values are accepted; anything else leaves the current
    /// value alone.
    pub fn accept(&self, text: &str) -> Option<f64> {
        let value = parse_decimal(text).ok()?;
        (self.min..=self.max)
            .contains(&value)
            .then(|| round_to(value, self.decimals))
    }

    /// Final value once editing ends: clamped into range and rounded.
    /// Unparsable text falls back to `previous`.
    pub fn commit(&self, text: &str, previous: f64) -> f64 {
        match parse_decimal(text) {
            Ok(value) => self.settle(value),
            Err(_) => previous,
        }
    }

    pub fn increment(&self, value: f64) -> f64 {
        self.settle(value + self.step)
    }

    pub fn decrement(&self, value: f64) -> f64 {
        self.settle(value - self.step)
    }

    fn settle(&self, value: f64) -> f64 {
        round_to(value.clamp(self.min, self.max), self.decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_separators() {
        assert_eq!(parse_decimal("0,003").unwrap(), 0.003);
        assert_eq!(parse_decimal(" 0.2 ").unwrap(), 0.2);
        assert!(parse_decimal("").is_err());
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("1,2,3").is_err());
        assert!(parse_decimal("inf").is_err());
    }

    #[test]
    fn formats_with_comma() {
        assert_eq!(format_decimal(0.003), "0,003");
        assert_eq!(format_decimal(1.0), "1");
    }

    #[test]
    fn accept_ignores_out_of_range() {
        assert_eq!(ParameterField::RHO.accept("0,004"), Some(0.004));
        assert_eq!(ParameterField::RHO.accept("0,02"), None);
        assert_eq!(ParameterField::TAU.accept("-0,1"), None);
        assert_eq!(ParameterField::TAU.accept("0,"), Some(0.0));
    }

    #[test]
    fn commit_clamps_and_falls_back() {
        assert_eq!(ParameterField::RHO.commit("0,5", 0.003), 0.01);
        assert_eq!(ParameterField::THETA.commit("-3", 0.8), 0.0);
        assert_eq!(ParameterField::THETA.commit("x", 0.8), 0.8);
        assert_eq!(ParameterField::FEES.commit("0,0712345", 0.05), 0.07123);
    }

    #[test]
    fn stepping_stays_in_bounds() {
        assert_eq!(ParameterField::RHO.increment(0.003), 0.004);
        assert_eq!(ParameterField::RHO.increment(0.0095), 0.01);
        assert_eq!(ParameterField::TAU.decrement(0.05), 0.0);
        assert_eq!(ParameterField::TAU.increment(0.2), 0.3);
    }
}
