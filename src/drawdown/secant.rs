//! Secant-method drawdown solver
//!
//! Drives the simulated ending balance to zero with a general root finder.
//! Divergence and non-convergence surface as the same failure.

use super::simulate::{floor_distribution, simulate_drawdown};
use super::validate;
use crate::error::DrawdownError;
use crate::roots;
use serde::Serialize;

pub const DEFAULT_SECANT_ITERS: usize = 50;
pub const DEFAULT_SECANT_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SecantOptions {
    pub iters: usize,
    pub epsilon: f64,
}

impl Default for SecantOptions {
    fn default() -> Self {
        Self {
            iters: DEFAULT_SECANT_ITERS,
            epsilon: DEFAULT_SECANT_EPSILON,
        }
    }
}

/// Constant withdrawal that drains `starting_amount` in `years` periods, with
/// default options
pub fn find_optimal_distribution_secant(
    starting_amount: f64,
    return_rate: f64,
    years: u32,
) -> Result<f64, DrawdownError> {
    find_optimal_distribution_secant_with(starting_amount, return_rate, years, SecantOptions::default())
}

/// Constant withdrawal that drains `starting_amount` in `years` periods.
///
/// The unknown is the withdrawal above the balance-preserving floor, seeded
/// at `starting_amount / years` with a second guess one residual step away.
pub fn find_optimal_distribution_secant_with(
    starting_amount: f64,
    return_rate: f64,
    years: u32,
    options: SecantOptions,
) -> Result<f64, DrawdownError> {
    if starting_amount == 0.0 {
        return Ok(0.0);
    }
    validate(starting_amount, return_rate, years)?;

    let min_dist = floor_distribution(starting_amount, return_rate);
    let periods = f64::from(years);
    let residual = |offset: f64| simulate_drawdown(starting_amount, years, min_dist + offset, return_rate);

    let first = starting_amount / periods;
    let second = first + residual(first) / periods;

    let offset = roots::secant(residual, first, second, options.iters, options.epsilon)?;
    log::debug!(
        "secant drawdown for return_rate={}, years={}: {:.2} = {:.2} + {:.2}",
        return_rate,
        years,
        min_dist + offset,
        min_dist,
        offset
    );
    Ok(min_dist + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawdown::find_optimal_distribution;
    use crate::error::RootError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_monthly_sixty_periods() {
        let dist = find_optimal_distribution_secant(10_000.0, 0.00625, 60).unwrap();
        let ending = simulate_drawdown(10_000.0, 60, dist, 0.00625);
        assert!(ending.abs() < DEFAULT_SECANT_EPSILON, "ending balance {}", ending);
    }

    #[test]
    fn test_agrees_with_fixed_point() {
        let secant = find_optimal_distribution_secant(10_000.0, 0.00625, 60).unwrap();
        let fixed = find_optimal_distribution(10_000.0, 0.00625, 60).unwrap();
        assert_abs_diff_eq!(secant, fixed, epsilon = 1e-3);
    }

    #[test]
    fn test_matches_annuity_formula() {
        // Withdrawals at the start of each period: PV of an annuity due
        let (s, r, n) = (500_000.0, 0.05, 30);
        let growth: f64 = 1.0 + r;
        let expected = s * r / (growth * (1.0 - growth.powi(-n)));
        let dist = find_optimal_distribution_secant(s, r, n as u32).unwrap();
        assert_abs_diff_eq!(dist, expected, epsilon = 1e-4);
    }

    #[test]
    fn test_handles_regime_where_fixed_point_diverges() {
        assert!(find_optimal_distribution(10_000.0, 0.0, 2).is_err());
        let dist = find_optimal_distribution_secant(10_000.0, 0.0, 2).unwrap();
        assert_abs_diff_eq!(dist, 5_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_balance_short_circuits() {
        assert_eq!(find_optimal_distribution_secant(0.0, 0.0, 30), Ok(0.0));
        assert_eq!(find_optimal_distribution_secant(0.0, 0.07, 1), Ok(0.0));
        assert_eq!(find_optimal_distribution_secant(0.0, 0.0, 0), Ok(0.0));
    }

    #[test]
    fn test_zero_budget_is_an_error() {
        let options = SecantOptions {
            iters: 0,
            epsilon: 1e-12,
        };
        let err = find_optimal_distribution_secant_with(10_000.0, 0.05, 30, options).unwrap_err();
        assert!(matches!(
            err,
            DrawdownError::NoConvergence(RootError::IterationLimit { iterations: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_inputs() {
        assert!(matches!(
            find_optimal_distribution_secant(f64::NAN, 0.05, 30),
            Err(DrawdownError::InvalidInput(_))
        ));
        assert!(matches!(
            find_optimal_distribution_secant(1_000.0, f64::INFINITY, 30),
            Err(DrawdownError::InvalidInput(_))
        ));
    }
}
