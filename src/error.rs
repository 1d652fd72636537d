//! Error types for bracket construction, table loading and the drawdown solvers

use thiserror::Error;

/// A bracket definition that cannot be evaluated.
///
/// Raised at construction time so malformed tables never reach the tax
/// computations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BracketError {
    #[error("rate {rate} of range [{lower}, {upper}) is not between 0 and 1")]
    RateOutOfBounds { lower: f64, upper: f64, rate: f64 },

    #[error("range upper bound {upper} is below lower bound {lower}")]
    InvertedBounds { lower: f64, upper: f64 },

    #[error("range bounds must not be NaN")]
    NanBound,

    #[error("bracket has no ranges")]
    Empty,

    #[error("first range starts at {0}, expected 0")]
    LowerBoundNotZero(f64),

    #[error("last range ends at {0}, expected infinity")]
    UpperBoundNotInfinite(f64),

    #[error("gap between range {index} (ends at {upper}) and the next range (starts at {next_lower})")]
    Gap {
        index: usize,
        upper: f64,
        next_lower: f64,
    },
}

/// Errors that can occur while loading a bracket table.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: expected 2 columns (upper_bound,rate), found {found}")]
    ColumnCount { row: usize, found: usize },

    #[error("row {row}: invalid {field} value {value:?}")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("row {row}: only the final row may leave the upper bound blank")]
    UnboundedRowNotLast { row: usize },

    #[error("invalid bracket: {0}")]
    Bracket(#[from] BracketError),
}

/// Root finding failures.
///
/// Each variant carries the last relevant `x` position for diagnostics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RootError {
    #[error("secant is flat at x = {x}: successive residuals are equal")]
    FlatSecant { x: f64 },

    #[error("iterate became non-finite ({x_new})")]
    NonFinite { x_new: f64 },

    #[error("no root within {iterations} iterations (last x = {last_x}, residual = {residual})")]
    IterationLimit {
        iterations: usize,
        last_x: f64,
        residual: f64,
    },
}

/// Failure to find a constant withdrawal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawdownError {
    #[error("divergence for return_rate={return_rate}, years={years} at iteration {iteration}")]
    Diverged {
        return_rate: f64,
        years: u32,
        iteration: usize,
    },

    #[error("didn't finish for return_rate={return_rate}, years={years}, iters={iters} \u{03B5}={epsilon}")]
    Exhausted {
        return_rate: f64,
        years: u32,
        iters: usize,
        epsilon: f64,
    },

    #[error("secant solver did not converge: {0}")]
    NoConvergence(#[from] RootError),

    #[error("invalid drawdown input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_display() {
        let err = BracketError::Gap {
            index: 2,
            upper: 100.0,
            next_lower: 150.0,
        };
        assert_eq!(
            err.to_string(),
            "gap between range 2 (ends at 100) and the next range (starts at 150)"
        );
    }

    #[test]
    fn test_bracket_error_wraps_into_load_error() {
        let err: LoadError = BracketError::Empty.into();
        assert!(matches!(err, LoadError::Bracket(BracketError::Empty)));
        assert_eq!(err.to_string(), "invalid bracket: bracket has no ranges");
    }

    #[test]
    fn test_root_error_wraps_into_drawdown_error() {
        let err: DrawdownError = RootError::FlatSecant { x: 1.0 }.into();
        assert!(matches!(err, DrawdownError::NoConvergence(_)));
    }

    #[test]
    fn test_exhausted_display_mentions_epsilon() {
        let err = DrawdownError::Exhausted {
            return_rate: 0.05,
            years: 30,
            iters: 10,
            epsilon: 0.01,
        };
        assert!(err.to_string().contains("\u{03B5}=0.01"));
    }
}
