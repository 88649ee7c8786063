//! Function plumbing: the callable type shared by user registrations and
//! builtins, and the lazily-memoizing built-in factory.

use std::sync::Arc;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use gridcalc_common::{CalcError, VariantList};

use crate::builtins;

/// A callable the evaluator can dispatch to.
pub type CalcFn = Arc<dyn Fn(&VariantList) -> Result<f64, CalcError>>;

pub(crate) type BuiltinFn = fn(&VariantList) -> Result<f64, CalcError>;

// Fixed dispatch table, canonical lowercase names and aliases included.
static BUILTINS: Lazy<FxHashMap<&'static str, BuiltinFn>> = Lazy::new(|| {
    let mut reg: FxHashMap<&'static str, BuiltinFn> = FxHashMap::default();
    builtins::numeric::register(&mut reg);
    builtins::stats::register(&mut reg);
    builtins::criteria::register(&mut reg);
    reg
});

/// Case-insensitive built-in lookup, memoized under the lowercased name.
///
/// The memo is per calculator instance and bounded by the fixed set of
/// built-in names; nothing global is mutated.
#[derive(Default)]
pub struct FunctionFactory {
    cache: FxHashMap<String, CalcFn>,
}

impl FunctionFactory {
    pub fn new() -> Self {
        FunctionFactory::default()
    }

    pub fn resolve(&mut self, name: &str) -> Option<CalcFn> {
        let key = name.to_ascii_lowercase();
        if let Some(f) = self.cache.get(&key) {
            return Some(Arc::clone(f));
        }
        let raw = *BUILTINS.get(key.as_str())?;
        let f: CalcFn = Arc::new(raw);
        self.cache.insert(key, Arc::clone(&f));
        Some(f)
    }
}
