//! Outcome of a single bracket evaluation

use serde::Serialize;

/// Inputs and per-range breakdown of one `TaxBracket::tax` call.
///
/// `breakdown[i]` is the tax contributed by the bracket's `i`-th range. It
/// stops at the first range the taxable amount does not reach, and is empty
/// for zero results and for margin evaluations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxResult {
    pub full_amount: f64,
    pub taxable_amount: f64,
    pub margin: f64,
    pub tax_paid: f64,
    pub breakdown: Vec<f64>,
}

impl TaxResult {
    /// Result with no tax owed
    pub fn zero(full_amount: f64, deduction: f64, margin: f64) -> Self {
        Self {
            full_amount,
            taxable_amount: full_amount - deduction,
            margin,
            tax_paid: 0.0,
            breakdown: Vec::new(),
        }
    }

    /// Amount left after tax
    pub fn remaining(&self) -> f64 {
        self.full_amount - self.tax_paid
    }

    /// Taxable amount floored at zero
    pub fn real_taxable_amount(&self) -> f64 {
        self.taxable_amount.max(0.0)
    }

    /// Tax paid as a fraction of the full amount (0 for a zero amount)
    pub fn real_effective_tax_rate(&self) -> f64 {
        if self.full_amount == 0.0 {
            0.0
        } else {
            self.tax_paid / self.full_amount
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_derived_accessors() {
        let result = TaxResult {
            full_amount: 50_000.0,
            taxable_amount: 37_450.0,
            margin: 0.0,
            tax_paid: 4_244.0,
            breakdown: vec![995.0, 3_249.0],
        };
        assert_abs_diff_eq!(result.remaining(), 45_756.0);
        assert_abs_diff_eq!(result.real_taxable_amount(), 37_450.0);
        assert_abs_diff_eq!(result.real_effective_tax_rate(), 0.08488, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_result() {
        let result = TaxResult::zero(5_000.0, 12_550.0, 0.0);
        assert_eq!(result.tax_paid, 0.0);
        assert!(result.breakdown.is_empty());
        assert_abs_diff_eq!(result.taxable_amount, -7_550.0);
        assert_eq!(result.real_taxable_amount(), 0.0);
        assert_abs_diff_eq!(result.remaining(), 5_000.0);
    }

    #[test]
    fn test_effective_rate_guards_zero_amount() {
        let result = TaxResult::zero(0.0, 0.0, 0.0);
        assert_eq!(result.real_effective_tax_rate(), 0.0);
    }
}
