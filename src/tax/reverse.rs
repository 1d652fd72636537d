//! Inverting a tax function: find the gross amount that nets a target

use serde::Serialize;

/// Default convergence tolerance on the after-tax residual
pub const DEFAULT_REVERSE_EPSILON: f64 = 1e-2;

/// Default iteration budget
pub const DEFAULT_REVERSE_ITERS: usize = 20;

/// Tolerance and iteration budget for reverse-tax solves
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReverseTaxOptions {
    pub epsilon: f64,
    pub iters: usize,
}

impl Default for ReverseTaxOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_REVERSE_EPSILON,
            iters: DEFAULT_REVERSE_ITERS,
        }
    }
}

/// Outcome of a reverse-tax solve.
///
/// `converged == false` means the budget ran out and `amount` is the last
/// guess, which callers should treat as approximate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReverseSolve {
    pub amount: f64,
    pub iterations: usize,
    /// Last `final_amount - remaining(guess)` before the final update (NaN if no iteration ran)
    pub residual: f64,
    pub converged: bool,
}

/// Fixed-point iteration `guess += final_amount - remaining(guess)`, seeded at
/// `final_amount`.
///
/// Never fails: an exhausted budget logs a warning and returns the best guess.
pub(crate) fn solve_reverse<F>(final_amount: f64, options: ReverseTaxOptions, remaining: F) -> ReverseSolve
where
    F: Fn(f64) -> f64,
{
    let mut guess = final_amount;
    let mut off = f64::NAN;

    for i in 0..options.iters {
        let leftover = remaining(guess);
        off = final_amount - leftover;
        guess += off;

        if off.abs() < options.epsilon {
            return ReverseSolve {
                amount: guess,
                iterations: i + 1,
                residual: off,
                converged: true,
            };
        }
    }

    log::warn!(
        "reverse tax for {:.2} did not reach \u{03B5}={} in {} iterations (last residual {:.6}); returning best guess {:.2}",
        final_amount,
        options.epsilon,
        options.iters,
        off,
        guess
    );

    ReverseSolve {
        amount: guess,
        iterations: options.iters,
        residual: off,
        converged: false,
    }
}
