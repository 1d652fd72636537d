//! Constant-withdrawal ("igwad") solvers
//!
//! Both solvers find the per-period withdrawal that leaves approximately
//! nothing after the last period:
//! - [`find_optimal_distribution`]: calibrated fixed-point iteration, fast
//!   inside its fitted regime, fails fast when it diverges
//! - [`find_optimal_distribution_secant`]: general secant root finding

mod fixed_point;
mod secant;
mod simulate;

pub use fixed_point::{
    calibration_scale, find_optimal_distribution, find_optimal_distribution_with, FixedPointOptions,
    DEFAULT_FIXED_POINT_EPSILON, DEFAULT_FIXED_POINT_ITERS,
};
pub use secant::{
    find_optimal_distribution_secant, find_optimal_distribution_secant_with, SecantOptions,
    DEFAULT_SECANT_EPSILON, DEFAULT_SECANT_ITERS,
};
pub use simulate::{floor_distribution, simulate_drawdown};

use crate::error::DrawdownError;
use serde::Serialize;

/// Which solver to use, with its options
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DrawdownMethod {
    FixedPoint(FixedPointOptions),
    Secant(SecantOptions),
}

impl DrawdownMethod {
    pub fn solve(self, starting_amount: f64, return_rate: f64, years: u32) -> Result<f64, DrawdownError> {
        match self {
            DrawdownMethod::FixedPoint(options) => {
                find_optimal_distribution_with(starting_amount, return_rate, years, options)
            }
            DrawdownMethod::Secant(options) => {
                find_optimal_distribution_secant_with(starting_amount, return_rate, years, options)
            }
        }
    }

    /// Convergence tolerance on the ending balance
    pub fn epsilon(&self) -> f64 {
        match self {
            DrawdownMethod::FixedPoint(options) => options.epsilon,
            DrawdownMethod::Secant(options) => options.epsilon,
        }
    }
}

impl Default for DrawdownMethod {
    fn default() -> Self {
        DrawdownMethod::Secant(SecantOptions::default())
    }
}

fn validate(starting_amount: f64, return_rate: f64, years: u32) -> Result<(), DrawdownError> {
    if !starting_amount.is_finite() {
        return Err(DrawdownError::InvalidInput(format!(
            "starting_amount must be finite, got {}",
            starting_amount
        )));
    }
    if !return_rate.is_finite() {
        return Err(DrawdownError::InvalidInput(format!(
            "return_rate must be finite, got {}",
            return_rate
        )));
    }
    if years == 0 {
        return Err(DrawdownError::InvalidInput("years must be > 0".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_methods_agree_where_both_apply() {
        let fixed = DrawdownMethod::FixedPoint(FixedPointOptions::default())
            .solve(250_000.0, 0.0, 25)
            .unwrap();
        let secant = DrawdownMethod::default().solve(250_000.0, 0.0, 25).unwrap();
        assert!((fixed - secant).abs() < 1e-3);
        assert!((secant - 10_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_epsilon_reports_configured_tolerance() {
        let method = DrawdownMethod::Secant(SecantOptions {
            iters: 10,
            epsilon: 0.5,
        });
        assert_eq!(method.epsilon(), 0.5);
        assert_eq!(DrawdownMethod::default().epsilon(), DEFAULT_SECANT_EPSILON);
    }
}
