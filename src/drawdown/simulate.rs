//! Deterministic balance roll-forward shared by both solvers

/// Balance left after `years` periods of withdrawing `distribution` and then
/// growing the rest at `return_rate`.
///
/// This is the residual the solvers drive to zero.
pub fn simulate_drawdown(starting_amount: f64, years: u32, distribution: f64, return_rate: f64) -> f64 {
    let growth = 1.0 + return_rate;
    let mut amount = starting_amount;
    for _ in 0..years {
        amount -= distribution;
        amount *= growth;
    }
    amount
}

/// Withdrawal that keeps the balance exactly flat: each period's growth
/// replaces what was taken out. Zero when there is no growth.
pub fn floor_distribution(starting_amount: f64, return_rate: f64) -> f64 {
    if return_rate == 0.0 {
        0.0
    } else {
        starting_amount / (1.0 / return_rate + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_no_growth_is_linear() {
        assert_abs_diff_eq!(simulate_drawdown(10_000.0, 10, 1_000.0, 0.0), 0.0);
        assert_abs_diff_eq!(simulate_drawdown(10_000.0, 4, 1_000.0, 0.0), 6_000.0);
    }

    #[test]
    fn test_withdraw_then_grow() {
        // (1000 - 100) * 1.1 = 990, (990 - 100) * 1.1 = 979
        assert_abs_diff_eq!(simulate_drawdown(1_000.0, 2, 100.0, 0.1), 979.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_years_returns_start() {
        assert_eq!(simulate_drawdown(1_234.0, 0, 100.0, 0.05), 1_234.0);
    }

    #[test]
    fn test_floor_keeps_balance_flat() {
        let floor = floor_distribution(10_000.0, 0.05);
        assert_abs_diff_eq!(simulate_drawdown(10_000.0, 40, floor, 0.05), 10_000.0, epsilon = 1e-6);
        assert_eq!(floor_distribution(10_000.0, 0.0), 0.0);
    }
}
