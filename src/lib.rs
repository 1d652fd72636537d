//! Retirement Sim - tax and drawdown kernels for multi-decade retirement simulations
//!
//! This library provides:
//! - Progressive tax-bracket evaluation (full breakdown, fast lookup, inverse)
//! - Stacked federal/state/payroll taxes over one income
//! - Bracket table loading from CSV
//! - Constant-withdrawal drawdown solvers (calibrated fixed-point and secant)
//! - A scenario runner producing taxed year-by-year drawdown schedules

pub mod drawdown;
pub mod error;
pub mod roots;
pub mod scenario;
pub mod tax;

// Re-export commonly used types
pub use drawdown::{
    find_optimal_distribution, find_optimal_distribution_secant, simulate_drawdown, DrawdownMethod,
};
pub use error::{BracketError, DrawdownError, LoadError, RootError};
pub use scenario::{DrawdownConfig, DrawdownSchedule, ScenarioRunner};
pub use tax::{load_tax_bracket, CombinedTax, ReverseTaxOptions, TaxBracket, TaxRange, TaxResult};
