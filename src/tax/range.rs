//! A single marginal-rate interval of a bracket

use crate::error::BracketError;
use serde::Serialize;
use std::fmt;

/// Income interval `[lower, upper)` taxed at a flat marginal `rate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxRange {
    lower: f64,
    upper: f64,
    rate: f64,
}

impl TaxRange {
    /// Create a range. `upper` may be `f64::INFINITY`; `rate` must be in `[0, 1]`.
    pub fn new(lower: f64, upper: f64, rate: f64) -> Result<Self, BracketError> {
        if lower.is_nan() || upper.is_nan() {
            return Err(BracketError::NanBound);
        }
        if upper < lower {
            return Err(BracketError::InvertedBounds { lower, upper });
        }
        if !(0.0..=1.0).contains(&rate) {
            return Err(BracketError::RateOutOfBounds { lower, upper, rate });
        }
        Ok(Self { lower, upper, rate })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Width of the range (infinite for the top range)
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Portion of `total` that falls inside this range.
    ///
    /// e.g. for the range $10 -> $25 and a total of $15 this is $5.
    pub fn amount_in_range(&self, total: f64) -> f64 {
        (total - self.lower).max(0.0).min(self.width())
    }

    /// Tax owed on the part of `amount` inside this range
    pub fn tax(&self, amount: f64) -> f64 {
        self.amount_in_range(amount) * self.rate
    }
}

impl fmt::Display for TaxRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${:.2} -> ${:.2} @ {:.2}%",
            self.lower,
            self.upper,
            self.rate * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_amount_in_range() {
        let range = TaxRange::new(10.0, 25.0, 0.1).unwrap();
        assert_abs_diff_eq!(range.amount_in_range(15.0), 5.0);
        assert_abs_diff_eq!(range.amount_in_range(5.0), 0.0);
        assert_abs_diff_eq!(range.amount_in_range(100.0), 15.0);
        assert_abs_diff_eq!(range.tax(100.0), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_open_ended_range() {
        let range = TaxRange::new(523_600.0, f64::INFINITY, 0.37).unwrap();
        assert_abs_diff_eq!(range.amount_in_range(600_000.0), 76_400.0);
        assert_abs_diff_eq!(range.amount_in_range(0.0), 0.0);
        assert_abs_diff_eq!(range.tax(600_000.0), 28_268.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_bad_rate_and_bounds() {
        assert!(matches!(
            TaxRange::new(0.0, 10.0, 1.5),
            Err(BracketError::RateOutOfBounds { .. })
        ));
        assert!(matches!(
            TaxRange::new(0.0, 10.0, -0.1),
            Err(BracketError::RateOutOfBounds { .. })
        ));
        assert!(matches!(
            TaxRange::new(20.0, 10.0, 0.1),
            Err(BracketError::InvertedBounds { .. })
        ));
        assert_eq!(TaxRange::new(f64::NAN, 10.0, 0.1), Err(BracketError::NanBound));
    }

    #[test]
    fn test_display() {
        let range = TaxRange::new(0.0, 9950.0, 0.10).unwrap();
        assert_eq!(range.to_string(), "$0.00 -> $9950.00 @ 10.00%");
    }
}
