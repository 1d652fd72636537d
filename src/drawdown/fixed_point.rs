//! Calibrated fixed-point drawdown solver
//!
//! Each iteration spreads the previous ending balance over a scale factor
//! `gamma * kappa` fitted offline against `return_rate` and `years`. Inside the
//! fitted regime the residual shrinks geometrically; outside it the residual
//! grows and the solve fails fast.

use super::simulate::{floor_distribution, simulate_drawdown};
use super::validate;
use crate::error::DrawdownError;
use serde::Serialize;

// Calibration constants, fitted offline. Not physically meaningful.
const GAMMA_SCALE: f64 = 0.8805;
const GAMMA_BASE: f64 = 8_629_272.0;
const KAPPA_SCALE: f64 = 0.6444;
const KAPPA_BASE: f64 = 1.1543;

pub const DEFAULT_FIXED_POINT_ITERS: usize = 5000;
pub const DEFAULT_FIXED_POINT_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FixedPointOptions {
    pub iters: usize,
    pub epsilon: f64,
}

impl Default for FixedPointOptions {
    fn default() -> Self {
        Self {
            iters: DEFAULT_FIXED_POINT_ITERS,
            epsilon: DEFAULT_FIXED_POINT_EPSILON,
        }
    }
}

/// Non-terminal and terminal outcomes of one iteration
#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Iterating { ending: f64 },
    Converged,
    Diverged,
}

fn classify(ending: f64, prior_ending: f64, epsilon: f64) -> Step {
    if ending.abs() > prior_ending.abs() {
        Step::Diverged
    } else if ending.abs() < epsilon {
        Step::Converged
    } else {
        Step::Iterating { ending }
    }
}

/// Combined scale factor `gamma * kappa` for a `(return_rate, years)` pair
pub fn calibration_scale(return_rate: f64, years: u32) -> f64 {
    let gamma = GAMMA_SCALE * GAMMA_BASE.powf(return_rate);
    let kappa = KAPPA_SCALE * KAPPA_BASE.powi(years as i32);
    gamma * kappa
}

/// Constant withdrawal that drains `starting_amount` in `years` periods, with
/// default options
pub fn find_optimal_distribution(
    starting_amount: f64,
    return_rate: f64,
    years: u32,
) -> Result<f64, DrawdownError> {
    find_optimal_distribution_with(starting_amount, return_rate, years, FixedPointOptions::default())
}

/// Constant withdrawal that drains `starting_amount` in `years` periods.
///
/// Fails with [`DrawdownError::Diverged`] as soon as the ending balance grows
/// between iterations, and with [`DrawdownError::Exhausted`] when
/// `options.iters` runs out.
pub fn find_optimal_distribution_with(
    starting_amount: f64,
    return_rate: f64,
    years: u32,
    options: FixedPointOptions,
) -> Result<f64, DrawdownError> {
    validate(starting_amount, return_rate, years)?;

    let scale = calibration_scale(return_rate, years);
    let min_dist = floor_distribution(starting_amount, return_rate);

    let mut guess = 0.0;
    let mut prior_ending = starting_amount;

    for iteration in 0..options.iters {
        guess += prior_ending / scale;
        let dist = min_dist + guess;
        let ending = simulate_drawdown(starting_amount, years, dist, return_rate);

        match classify(ending, prior_ending, options.epsilon) {
            Step::Diverged => {
                log::warn!(
                    "fixed-point drawdown diverged for return_rate={}, years={} at iteration {} ({:.2} -> {:.2})",
                    return_rate,
                    years,
                    iteration,
                    prior_ending,
                    ending
                );
                return Err(DrawdownError::Diverged {
                    return_rate,
                    years,
                    iteration,
                });
            }
            Step::Converged => {
                log::debug!(
                    "fixed-point drawdown converged in {} iterations: {:.2} = {:.2} + {:.2}",
                    iteration + 1,
                    dist,
                    min_dist,
                    guess
                );
                return Ok(dist);
            }
            Step::Iterating { ending } => prior_ending = ending,
        }
    }

    Err(DrawdownError::Exhausted {
        return_rate,
        years,
        iters: options.iters,
        epsilon: options.epsilon,
    })
}
