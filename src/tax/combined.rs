//! Several brackets levied on the same income
//!
//! Federal, state and payroll taxes all apply to one gross amount, each with
//! its own deduction. `CombinedTax` sums them and inverts the total.

use super::bracket::TaxBracket;
use super::cache::{ReverseTaxCache, ReverseTaxKey};
use super::result::TaxResult;
use super::reverse::{solve_reverse, ReverseSolve, ReverseTaxOptions};
use serde::Serialize;

/// Ordered `(bracket, deduction)` components
#[derive(Debug, Clone)]
pub struct CombinedTax {
    components: Vec<(TaxBracket, f64)>,
    reverse_cache: ReverseTaxCache,
}

/// Per-component results of one combined evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedTaxResult {
    pub full_amount: f64,
    pub margin: f64,
    pub tax_paid: f64,
    pub components: Vec<TaxResult>,
}

impl CombinedTaxResult {
    pub fn remaining(&self) -> f64 {
        self.full_amount - self.tax_paid
    }

    pub fn real_effective_tax_rate(&self) -> f64 {
        if self.full_amount == 0.0 {
            0.0
        } else {
            self.tax_paid / self.full_amount
        }
    }
}

impl CombinedTax {
    pub fn new(components: Vec<(TaxBracket, f64)>) -> Self {
        Self {
            components,
            reverse_cache: ReverseTaxCache::new(),
        }
    }

    pub fn components(&self) -> &[(TaxBracket, f64)] {
        &self.components
    }

    pub fn reverse_cache(&self) -> &ReverseTaxCache {
        &self.reverse_cache
    }

    /// Evaluate every component on `full_amount` stacked above `margin`
    pub fn tax(&self, full_amount: f64, margin: f64) -> CombinedTaxResult {
        let components: Vec<TaxResult> = self
            .components
            .iter()
            .map(|(bracket, deduction)| bracket.tax(full_amount, *deduction, margin))
            .collect();
        let tax_paid = components.iter().map(|r| r.tax_paid).sum();

        CombinedTaxResult {
            full_amount,
            margin,
            tax_paid,
            components,
        }
    }

    /// Total tax without per-component detail
    pub fn fast_tax(&self, full_amount: f64, margin: f64) -> f64 {
        self.components
            .iter()
            .map(|(bracket, deduction)| bracket.fast_tax(full_amount, *deduction, margin))
            .sum()
    }

    /// Gross amount leaving `final_amount` after every component, with default options
    pub fn reverse_tax(&self, final_amount: f64, margin: f64) -> f64 {
        self.reverse_tax_with(final_amount, margin, ReverseTaxOptions::default())
    }

    /// Gross amount leaving `final_amount` after every component. Best effort
    /// like [`TaxBracket::reverse_tax_with`].
    pub fn reverse_tax_with(&self, final_amount: f64, margin: f64, options: ReverseTaxOptions) -> f64 {
        self.reverse_tax_detailed(final_amount, margin, options).amount
    }

    pub fn reverse_tax_detailed(
        &self,
        final_amount: f64,
        margin: f64,
        options: ReverseTaxOptions,
    ) -> ReverseSolve {
        // Deductions live in the components, so the key's deduction slot is unused.
        let key = ReverseTaxKey::new(final_amount, 0.0, margin, options);
        self.reverse_cache.get_or_insert_with(key, || {
            solve_reverse(final_amount, options, |gross| gross - self.fast_tax(gross, margin))
        })
    }
}
