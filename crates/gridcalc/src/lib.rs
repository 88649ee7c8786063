//! Meta crate that re-exports the gridcalc building blocks with sensible
//! defaults. Downstream users can depend on this crate alone; the `serde`
//! and `tracing` features forward to the underlying layers.
//!
//! ```
//! use gridcalc::Calculator;
//!
//! let mut calc = Calculator::new();
//! calc.set_variable("x", 4.0);
//! assert_eq!(calc.compute("3x + 2").unwrap(), 14.0);
//! ```

pub use gridcalc_common as common;
pub use gridcalc_eval as eval;
pub use gridcalc_parse as parse;

pub use gridcalc_common::{CalcError, CellAddr, Variant, VariantList, VariantTag};
pub use gridcalc_eval::{Calculator, CellProvider, FunctionFactory, OperatorTable};
pub use gridcalc_parse::Tokenizer;
