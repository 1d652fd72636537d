//! Scenario runner for retirement drawdown schedules
//!
//! Pre-loads a tax bracket once, then solves the constant traditional-account
//! withdrawal for many `(balance, return, horizon)` configurations and taxes
//! each year's withdrawal.

use crate::drawdown::{simulate_drawdown, DrawdownMethod};
use crate::error::DrawdownError;
use crate::tax::{presets, TaxBracket};
use rayon::prelude::*;
use serde::Serialize;

/// One drawdown to solve and tax
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawdownConfig {
    /// Balance at retirement
    pub starting_amount: f64,
    /// Per-period return as a decimal (0 = no growth)
    pub return_rate: f64,
    /// Number of withdrawal periods
    pub years: u32,
    pub method: DrawdownMethod,
}

/// Balances and taxes for a single withdrawal year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawdownYear {
    /// 1-indexed
    pub year: u32,
    pub start_balance: f64,
    pub withdrawal: f64,
    pub tax_paid: f64,
    pub net_income: f64,
    pub end_balance: f64,
}

/// Solved withdrawal and its year-by-year schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawdownSchedule {
    pub config: DrawdownConfig,
    pub distribution: f64,
    pub years: Vec<DrawdownYear>,
}

/// Totals over a schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduleSummary {
    pub total_withdrawn: f64,
    pub total_tax: f64,
    pub total_net_income: f64,
    pub final_balance: f64,
}

impl DrawdownSchedule {
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            total_withdrawn: self.years.iter().map(|y| y.withdrawal).sum(),
            total_tax: self.years.iter().map(|y| y.tax_paid).sum(),
            total_net_income: self.years.iter().map(|y| y.net_income).sum(),
            final_balance: self
                .years
                .last()
                .map_or(self.config.starting_amount, |y| y.end_balance),
        }
    }
}

/// Pre-loaded scenario runner for batch drawdown schedules
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(load_tax_bracket("data/2021/single_tax.csv")?, 12_550.0);
///
/// for rate in [0.03, 0.04, 0.05] {
///     let config = DrawdownConfig { return_rate: rate, ... };
///     let schedule = runner.run(&config)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    bracket: TaxBracket,
    deduction: f64,
}

impl ScenarioRunner {
    pub fn new(bracket: TaxBracket, deduction: f64) -> Self {
        Self { bracket, deduction }
    }

    /// Runner over the built-in 2021 single-filer federal bracket
    pub fn single_2021() -> Self {
        Self::new(presets::single_2021(), presets::STANDARD_DEDUCTION_2021)
    }

    pub fn bracket(&self) -> &TaxBracket {
        &self.bracket
    }

    pub fn deduction(&self) -> f64 {
        self.deduction
    }

    /// Solve the constant withdrawal and tax every year of it
    pub fn run(&self, config: &DrawdownConfig) -> Result<DrawdownSchedule, DrawdownError> {
        let distribution = config
            .method
            .solve(config.starting_amount, config.return_rate, config.years)?;

        let tax_paid = self.bracket.fast_tax(distribution, self.deduction, 0.0);
        let net_income = distribution - tax_paid;

        let mut balance = config.starting_amount;
        let years = (1..=config.years)
            .map(|year| {
                let start_balance = balance;
                balance = simulate_drawdown(balance, 1, distribution, config.return_rate);
                DrawdownYear {
                    year,
                    start_balance,
                    withdrawal: distribution,
                    tax_paid,
                    net_income,
                    end_balance: balance,
                }
            })
            .collect();

        Ok(DrawdownSchedule {
            config: *config,
            distribution,
            years,
        })
    }

    /// Run many configurations in parallel; each result is independent
    pub fn run_batch(&self, configs: &[DrawdownConfig]) -> Vec<Result<DrawdownSchedule, DrawdownError>> {
        configs.par_iter().map(|config| self.run(config)).collect()
    }

    /// Gross withdrawal needed to net `net_income` after tax
    pub fn gross_withdrawal_for(&self, net_income: f64) -> f64 {
        self.bracket.reverse_tax(net_income, self.deduction, 0.0)
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::single_2021()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawdown::{FixedPointOptions, SecantOptions};
    use approx::assert_abs_diff_eq;

    fn config(return_rate: f64, years: u32) -> DrawdownConfig {
        DrawdownConfig {
            starting_amount: 1_000_000.0,
            return_rate,
            years,
            method: DrawdownMethod::Secant(SecantOptions::default()),
        }
    }

    #[test]
    fn test_schedule_drains_balance() {
        let runner = ScenarioRunner::single_2021();
        let schedule = runner.run(&config(0.04, 30)).unwrap();

        assert_eq!(schedule.years.len(), 30);
        assert_eq!(schedule.years[0].year, 1);
        assert_eq!(schedule.years[0].start_balance, 1_000_000.0);
        let summary = schedule.summary();
        assert!(summary.final_balance.abs() < 0.01, "final balance {}", summary.final_balance);
        assert_abs_diff_eq!(summary.total_withdrawn, schedule.distribution * 30.0, epsilon = 1e-6);
    }

    #[test]
    fn test_yearly_tax_uses_bracket() {
        let runner = ScenarioRunner::single_2021();
        let schedule = runner.run(&config(0.0, 25)).unwrap();
        // 40_000 a year, 27_450 taxable after the standard deduction
        assert_abs_diff_eq!(schedule.distribution, 40_000.0, epsilon = 1e-6);
        let year = schedule.years[10];
        assert_abs_diff_eq!(year.tax_paid, 995.0 + 0.12 * 17_500.0, epsilon = 1e-6);
        assert_abs_diff_eq!(year.net_income, year.withdrawal - year.tax_paid, epsilon = 1e-9);
    }

    #[test]
    fn test_batch_keeps_failures_separate() {
        let runner = ScenarioRunner::single_2021();
        let diverging = DrawdownConfig {
            starting_amount: 10_000.0,
            return_rate: 0.0,
            years: 2,
            method: DrawdownMethod::FixedPoint(FixedPointOptions::default()),
        };
        let results = runner.run_batch(&[config(0.03, 20), diverging, config(0.05, 20)]);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(DrawdownError::Diverged { .. })));
        // Higher return supports a larger withdrawal
        let low = results[0].as_ref().unwrap().distribution;
        let high = results[2].as_ref().unwrap().distribution;
        assert!(high > low);
    }

    #[test]
    fn test_gross_withdrawal_for_net() {
        let runner = ScenarioRunner::single_2021();
        let gross = runner.gross_withdrawal_for(50_000.0);
        let net = runner.bracket().tax(gross, runner.deduction(), 0.0).remaining();
        assert_abs_diff_eq!(net, 50_000.0, epsilon = 1e-2);
    }
}
