//! Amount fields and the rounding policy applied to derived amounts

use std::fmt::Display;

/// Value of one of the two converter input fields.
///
/// `Empty` is the absence of input and is distinct from zero. A `Value` is
/// always finite.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AmountField {
    #[default]
    Empty,
    Value(f64),
}

impl AmountField {
    /// Parses raw field text.
    ///
    /// Returns `Some(Empty)` for blank text, `Some(Value)` for a finite
    /// number and `None` when the text is not a number. `None` means the
    /// edit must be ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Some(AmountField::Empty);
        }
        // f64::from_str accepts "inf" and "NaN", neither is a valid amount
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(AmountField::Value(value)),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            AmountField::Empty => None,
            AmountField::Value(v) => Some(*v),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, AmountField::Empty)
    }

    /// Field value for an amount computed from the other field, rounded to
    /// `decimals` places. An overflowed result leaves the field empty.
    pub fn derived(value: f64, decimals: u32) -> Self {
        if value.is_finite() {
            AmountField::Value(round_to(value, decimals))
        } else {
            AmountField::Empty
        }
    }
}

impl From<Option<f64>> for AmountField {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => AmountField::Value(v),
            _ => AmountField::Empty,
        }
    }
}

impl Display for AmountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AmountField::Empty => write!(f, ""),
            AmountField::Value(v) => write!(f, "{v}"),
        }
    }
}

/// Rounds `value` to `decimals` places, halves away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    // Scaling very large values can overflow to infinity
    if rounded.is_finite() { rounded } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_and_blank() {
        assert_eq!(AmountField::parse(""), Some(AmountField::Empty));
        assert_eq!(AmountField::parse("   "), Some(AmountField::Empty));
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(AmountField::parse("100"), Some(AmountField::Value(100.0)));
        assert_eq!(AmountField::parse(" 12.5 "), Some(AmountField::Value(12.5)));
        assert_eq!(AmountField::parse("-3"), Some(AmountField::Value(-3.0)));
        assert_eq!(AmountField::parse("1e3"), Some(AmountField::Value(1000.0)));
        assert_eq!(AmountField::parse("0"), Some(AmountField::Value(0.0)));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(AmountField::parse("abc"), None);
        assert_eq!(AmountField::parse("12abc"), None);
        assert_eq!(AmountField::parse("NaN"), None);
        assert_eq!(AmountField::parse("inf"), None);
        assert_eq!(AmountField::parse("-infinity"), None);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(85.0, 2), 85.0);
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.235001, 2), 1.24);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(117.647058, 2), 117.65);
        assert_eq!(round_to(f64::MAX, 2), f64::MAX);
    }

    #[test]
    fn test_derived_is_always_finite() {
        assert_eq!(AmountField::derived(117.647058, 2), AmountField::Value(117.65));
        assert_eq!(AmountField::derived(f64::MAX * 10.0, 2), AmountField::Empty);
        assert_eq!(AmountField::derived(1.0 / 0.0, 2), AmountField::Empty);
        assert_eq!(AmountField::derived(f64::NAN, 2), AmountField::Empty);
    }

    #[test]
    fn test_display() {
        assert_eq!(AmountField::Empty.to_string(), "");
        assert_eq!(AmountField::Value(85.0).to_string(), "85");
        assert_eq!(AmountField::Value(0.85).to_string(), "0.85");
    }

    #[test]
    fn test_from_option() {
        assert_eq!(AmountField::from(None), AmountField::Empty);
        assert_eq!(AmountField::from(Some(1.0)), AmountField::Value(1.0));
        assert_eq!(AmountField::from(Some(f64::NAN)), AmountField::Empty);
    }
}
