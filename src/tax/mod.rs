//! Progressive income tax: ranges, brackets, inversion and table loading

mod bracket;
mod cache;
mod combined;
mod range;
mod result;
mod reverse;
pub mod loader;
pub mod presets;

pub use bracket::TaxBracket;
pub use cache::{ReverseTaxCache, ReverseTaxKey};
pub use combined::{CombinedTax, CombinedTaxResult};
pub use range::TaxRange;
pub use result::TaxResult;
pub use reverse::{ReverseSolve, ReverseTaxOptions, DEFAULT_REVERSE_EPSILON, DEFAULT_REVERSE_ITERS};
pub use loader::{load_tax_bracket, load_tax_bracket_from_reader, DEFAULT_BRACKET_DIR};
