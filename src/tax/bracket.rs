//! Progressive tax bracket: contiguous ranges spanning `[0, inf)`

use super::cache::{ReverseTaxCache, ReverseTaxKey};
use super::range::TaxRange;
use super::result::TaxResult;
use super::reverse::{solve_reverse, ReverseSolve, ReverseTaxOptions};
use crate::error::BracketError;
use std::fmt;

/// An ordered, gapless sequence of tax ranges from 0 to infinity.
///
/// Three evaluators are provided:
/// - [`TaxBracket::tax`]: full detail with per-range breakdown, O(n)
/// - [`TaxBracket::fast_tax`]: bare amount via binary search, O(log n)
/// - [`TaxBracket::reverse_tax`]: gross amount that nets a target, memoized
///
/// `tax(..).tax_paid` and `fast_tax(..)` agree for every input.
#[derive(Debug, Clone)]
pub struct TaxBracket {
    ranges: Vec<TaxRange>,

    /// Upper bound of each range, for binary search
    uppers: Vec<f64>,

    /// Tax owed at each range's lower bound (sum of all fully occupied ranges below it)
    cumulative: Vec<f64>,

    reverse_cache: ReverseTaxCache,
}

impl TaxBracket {
    /// Build a bracket, checking that the ranges start at 0, end at infinity
    /// and leave no gaps or overlaps between neighbours.
    pub fn new(ranges: Vec<TaxRange>) -> Result<Self, BracketError> {
        let first = ranges.first().ok_or(BracketError::Empty)?;
        if first.lower() != 0.0 {
            return Err(BracketError::LowerBoundNotZero(first.lower()));
        }

        let last = ranges.last().ok_or(BracketError::Empty)?;
        if last.upper() != f64::INFINITY {
            return Err(BracketError::UpperBoundNotInfinite(last.upper()));
        }

        for (index, pair) in ranges.windows(2).enumerate() {
            if pair[0].upper() != pair[1].lower() {
                return Err(BracketError::Gap {
                    index,
                    upper: pair[0].upper(),
                    next_lower: pair[1].lower(),
                });
            }
        }

        let uppers = ranges.iter().map(TaxRange::upper).collect();

        let mut cumulative = Vec::with_capacity(ranges.len());
        let mut running = 0.0;
        for range in &ranges {
            cumulative.push(running);
            running += range.tax(range.upper());
        }

        Ok(Self {
            ranges,
            uppers,
            cumulative,
            reverse_cache: ReverseTaxCache::new(),
        })
    }

    /// Build from `(upper_bound, rate)` rows; each lower bound is the previous
    /// row's upper bound, starting from 0.
    pub fn from_bounds(rows: &[(f64, f64)]) -> Result<Self, BracketError> {
        let mut lower = 0.0;
        let mut ranges = Vec::with_capacity(rows.len());
        for &(upper, rate) in rows {
            ranges.push(TaxRange::new(lower, upper, rate)?);
            lower = upper;
        }
        Self::new(ranges)
    }

    pub fn ranges(&self) -> &[TaxRange] {
        &self.ranges
    }

    /// Reverse-tax memo owned by this bracket
    pub fn reverse_cache(&self) -> &ReverseTaxCache {
        &self.reverse_cache
    }

    /// Tax owed on `full_amount` after `deduction`, stacked above `margin`
    /// of other income.
    ///
    /// A non-positive taxable amount or a negative margin owes nothing. With
    /// a positive margin the result is `tax(full + margin) - tax(margin)` and
    /// carries no breakdown.
    pub fn tax(&self, full_amount: f64, deduction: f64, margin: f64) -> TaxResult {
        let taxable_amount = full_amount - deduction;
        if taxable_amount + margin <= 0.0 || margin < 0.0 {
            return TaxResult::zero(full_amount, deduction, margin);
        }

        let mut breakdown = Vec::new();
        let tax_paid = if margin > 0.0 {
            self.walk(full_amount + margin - deduction, None) - self.walk(margin - deduction, None)
        } else {
            self.walk(taxable_amount, Some(&mut breakdown))
        };

        TaxResult {
            full_amount,
            taxable_amount,
            margin,
            tax_paid,
            breakdown,
        }
    }

    /// Same contract as `tax(..).tax_paid` without building a result
    pub fn fast_tax(&self, full_amount: f64, deduction: f64, margin: f64) -> f64 {
        let taxable_amount = full_amount - deduction;
        if taxable_amount + margin <= 0.0 || margin < 0.0 {
            return 0.0;
        }

        if margin > 0.0 {
            self.lookup(full_amount + margin - deduction) - self.lookup(margin - deduction)
        } else {
            self.lookup(taxable_amount)
        }
    }

    /// Gross amount whose after-tax remainder is `final_amount`, with default options
    pub fn reverse_tax(&self, final_amount: f64, deduction: f64, margin: f64) -> f64 {
        self.reverse_tax_with(final_amount, deduction, margin, ReverseTaxOptions::default())
    }

    /// Gross amount whose after-tax remainder is `final_amount`.
    ///
    /// Best effort: when `options.iters` runs out before the residual drops
    /// under `options.epsilon`, a warning is logged and the last guess is
    /// returned.
    pub fn reverse_tax_with(
        &self,
        final_amount: f64,
        deduction: f64,
        margin: f64,
        options: ReverseTaxOptions,
    ) -> f64 {
        self.reverse_tax_detailed(final_amount, deduction, margin, options)
            .amount
    }

    /// Reverse-tax solve including iteration count and convergence flag
    pub fn reverse_tax_detailed(
        &self,
        final_amount: f64,
        deduction: f64,
        margin: f64,
        options: ReverseTaxOptions,
    ) -> ReverseSolve {
        let key = ReverseTaxKey::new(final_amount, deduction, margin, options);
        self.reverse_cache.get_or_insert_with(key, || {
            solve_reverse(final_amount, options, |gross| {
                gross - self.fast_tax(gross, deduction, margin)
            })
        })
    }

    /// Linear walk accumulating each range's share; stops at the first range
    /// the amount does not reach.
    fn walk(&self, taxable_amount: f64, mut breakdown: Option<&mut Vec<f64>>) -> f64 {
        let mut tax_paid = 0.0;
        if taxable_amount <= 0.0 {
            return tax_paid;
        }

        for range in &self.ranges {
            if range.amount_in_range(taxable_amount) == 0.0 {
                break;
            }
            let contribution = range.tax(taxable_amount) - range.tax(0.0);
            if let Some(parts) = breakdown.as_mut() {
                parts.push(contribution);
            }
            tax_paid += contribution;
        }
        tax_paid
    }

    /// Binary search for the partially occupied range
    fn lookup(&self, taxable_amount: f64) -> f64 {
        if taxable_amount <= 0.0 {
            return 0.0;
        }

        let index = self
            .uppers
            .partition_point(|&upper| upper <= taxable_amount)
            .min(self.ranges.len() - 1);
        self.cumulative[index] + self.ranges[index].tax(taxable_amount)
    }
}

impl PartialEq for TaxBracket {
    fn eq(&self, other: &Self) -> bool {
        self.ranges == other.ranges
    }
}

impl fmt::Display for TaxBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", range)?;
        }
        Ok(())
    }
}
