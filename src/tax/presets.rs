//! Built-in 2021 single-filer tables
//!
//! In-memory copies of the tables bundled under `data/2021/`, so callers and
//! tests can evaluate taxes without touching the filesystem.

use super::bracket::TaxBracket;
use super::combined::CombinedTax;

pub const STANDARD_DEDUCTION_2021: f64 = 12_550.0;
pub const STANDARD_DEDUCTION_2021_VA: f64 = 4_500.0;
pub const STANDARD_DEDUCTION_2021_SS: f64 = 0.0;
pub const STANDARD_DEDUCTION_2021_MEDICARE: f64 = 0.0;

const SINGLE_2021: [(f64, f64); 7] = [
    (9_950.0, 0.10),
    (40_525.0, 0.12),
    (86_375.0, 0.22),
    (164_925.0, 0.24),
    (209_425.0, 0.32),
    (523_600.0, 0.35),
    (f64::INFINITY, 0.37),
];

const VA_SINGLE_2021: [(f64, f64); 4] = [
    (3_000.0, 0.02),
    (5_000.0, 0.03),
    (17_000.0, 0.05),
    (f64::INFINITY, 0.0575),
];

// Wage base cap; nothing above it is taxed
const SOCIAL_SECURITY_2021: [(f64, f64); 2] = [(142_800.0, 0.062), (f64::INFINITY, 0.0)];

// Additional 0.9% above the single-filer threshold
const MEDICARE_2021: [(f64, f64); 2] = [(200_000.0, 0.0145), (f64::INFINITY, 0.0235)];

fn build(rows: &[(f64, f64)]) -> TaxBracket {
    match TaxBracket::from_bounds(rows) {
        Ok(bracket) => bracket,
        // The tables above are contiguous from 0 to infinity with rates in [0, 1].
        Err(err) => unreachable!("built-in bracket table is invalid: {err}"),
    }
}

/// 2021 federal income tax, single filer
pub fn single_2021() -> TaxBracket {
    build(&SINGLE_2021)
}

/// 2021 Virginia income tax, single filer
pub fn va_single_2021() -> TaxBracket {
    build(&VA_SINGLE_2021)
}

/// 2021 Social Security (OASDI) employee tax
pub fn social_security_2021() -> TaxBracket {
    build(&SOCIAL_SECURITY_2021)
}

/// 2021 Medicare employee tax, single filer
pub fn medicare_2021() -> TaxBracket {
    build(&MEDICARE_2021)
}

/// Federal, Virginia, Social Security and Medicare taxes together, each with
/// its own deduction
pub fn combined_2021() -> CombinedTax {
    CombinedTax::new(vec![
        (single_2021(), STANDARD_DEDUCTION_2021),
        (va_single_2021(), STANDARD_DEDUCTION_2021_VA),
        (social_security_2021(), STANDARD_DEDUCTION_2021_SS),
        (medicare_2021(), STANDARD_DEDUCTION_2021_MEDICARE),
    ])
}
