//! Predicate counting over resolved range values.
//!
//! `countif` arrives pre-shaped by the normalizer: the argument list ends
//! with the numeric relation code it injected, then the matcher. Everything
//! before those two entries is a value under test.

use gridcalc_common::{CalcError, Variant, VariantList};
use rustc_hash::FxHashMap;

use crate::function::BuiltinFn;

/// Relation codes the normalizer injects between the range and the operand.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Relation {
    Equal,
    Greater,
    Less,
    NotEqual,
}

impl Relation {
    fn from_code(code: f64) -> Relation {
        if code == 1.0 {
            Relation::Greater
        } else if code == -1.0 {
            Relation::Less
        } else if code == 3.0 {
            Relation::NotEqual
        } else {
            Relation::Equal
        }
    }

    fn matches(self, comparison: i32) -> bool {
        match self {
            Relation::Equal => comparison == 0,
            Relation::Greater => comparison == 1,
            Relation::Less => comparison == -1,
            Relation::NotEqual => comparison != 0,
        }
    }
}

fn countif(args: &VariantList) -> Result<f64, CalcError> {
    if args.len() < 2 {
        return Err(CalcError::new(
            "countif function requires at least two parameters",
        ));
    }

    let relation = Relation::from_code(args.double(args.len() - 2));

    // The matcher may still carry its relation glyph; strip it before
    // reading the operand.
    let matcher = args.get(args.len() - 1).map(Variant::to_string).unwrap_or_default();
    let operand_text = match matcher.chars().next() {
        Some('<' | '>' | '!') => &matcher[1..],
        _ => matcher.as_str(),
    };
    let operand = Variant::interpret(operand_text);

    let mut count = 0usize;
    for value in args.iter().take(args.len() - 2) {
        // values arrive as numbers or raw cell text; text re-reads the way
        // the operand does so "True" can meet `true`
        let value = match value {
            Variant::Text(s) if s.is_empty() => continue,
            Variant::Text(s) => Variant::interpret(s),
            other => other.clone(),
        };
        if relation.matches(value.compare(&operand)) {
            count += 1;
        }
    }
    Ok(count as f64)
}

pub(crate) fn register(reg: &mut FxHashMap<&'static str, BuiltinFn>) {
    reg.insert("countif", countif);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(values: &[Variant]) -> VariantList {
        values.to_vec().into()
    }

    #[test]
    fn requires_two_parameters() {
        let err = countif(&list(&[Variant::Number(1.0)])).unwrap_err();
        assert_eq!(
            err.message(),
            "countif function requires at least two parameters"
        );
    }

    #[test]
    fn counts_less_than() {
        let args = list(&[
            Variant::Number(1.0),
            Variant::Number(2.0),
            Variant::Number(5.0),
            Variant::Number(9.0),
            Variant::Number(-1.0),      // relation code
            Variant::Text("<5".into()), // matcher
        ]);
        assert_eq!(countif(&args).unwrap(), 2.0);
    }

    #[test]
    fn counts_equality_with_boolean_coercion() {
        let args = list(&[
            Variant::Text("True".into()),
            Variant::Text("False".into()),
            Variant::Text("True".into()),
            Variant::Number(0.0),
            Variant::Text("true".into()),
        ]);
        assert_eq!(countif(&args).unwrap(), 2.0);
    }

    #[test]
    fn not_equal_spans_types() {
        // cross-tag comparison reads as "not equal", so text matches too
        let args = list(&[
            Variant::Number(5.0),
            Variant::Text("x".into()),
            Variant::Number(7.0),
            Variant::Number(3.0),
            Variant::Text("!5".into()),
        ]);
        assert_eq!(countif(&args).unwrap(), 2.0);
    }

    #[test]
    fn empty_text_values_are_skipped() {
        let args = list(&[
            Variant::Text(String::new()),
            Variant::Number(5.0),
            Variant::Number(0.0),
            Variant::Number(5.0),
        ]);
        assert_eq!(countif(&args).unwrap(), 1.0);
    }

    #[test]
    fn greater_than_numbers_in_text() {
        let args = list(&[
            Variant::Text("10".into()),
            Variant::Text("3".into()),
            Variant::Number(1.0),
            Variant::Text(">4".into()),
        ]);
        assert_eq!(countif(&args).unwrap(), 1.0);
    }
}
