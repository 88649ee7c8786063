pub mod tokenizer;

pub use tokenizer::{is_identifier, is_number, Tokenizer};

// Re-export common types
pub use gridcalc_common::{CalcError, CellAddr, Variant, VariantList, VariantTag};
