//! Scalar root finding
//!
//! Used to drive drawdown residuals to zero without a closed-form derivative.

use crate::error::RootError;

/// Find a root of `f` with the secant method, starting from the two guesses
/// `x0` and `x1`.
///
/// Converges once `|f(x)| < tolerance`; each secant step counts towards
/// `max_iter`.
pub fn secant<F>(f: F, x0: f64, x1: f64, max_iter: usize, tolerance: f64) -> Result<f64, RootError>
where
    F: Fn(f64) -> f64,
{
    let mut x_pre = x0;
    let mut f_pre = f(x_pre);
    if f_pre.abs() < tolerance {
        return Ok(x_pre);
    }

    let mut x_cur = x1;
    let mut f_cur = f(x_cur);
    if f_cur.abs() < tolerance {
        return Ok(x_cur);
    }

    for _ in 0..max_iter {
        let denom = f_cur - f_pre;
        if denom == 0.0 {
            return Err(RootError::FlatSecant { x: x_cur });
        }

        let x_new = x_cur - f_cur * (x_cur - x_pre) / denom;
        if !x_new.is_finite() {
            return Err(RootError::NonFinite { x_new });
        }

        let f_new = f(x_new);
        if f_new.abs() < tolerance {
            return Ok(x_new);
        }

        x_pre = x_cur;
        f_pre = f_cur;
        x_cur = x_new;
        f_cur = f_new;
    }

    Err(RootError::IterationLimit {
        iterations: max_iter,
        last_x: x_cur,
        residual: f_cur,
    })
}
