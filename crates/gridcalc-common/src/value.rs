//! The dynamic value model passed to user and built-in functions.
//!
//! `Variant` is a tagged union of the four shapes a resolved token can
//! take; `VariantList` is the argument vector a function call receives.
//! Comparison across different tags never errors: it is defined to be
//! "not equal", which the predicate builtins rely on.

use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::CalcError;

/// Tagged calculator value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Number(f64),
    Boolean(bool),
    Text(String),
    Empty,
}

/// Discriminant-only view of [`Variant`], used for argument preconditions.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VariantTag {
    Number,
    Boolean,
    Text,
    Empty,
}

impl Display for VariantTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VariantTag::Number => "number",
            VariantTag::Boolean => "boolean",
            VariantTag::Text => "text",
            VariantTag::Empty => "empty",
        })
    }
}

impl Variant {
    pub fn tag(&self) -> VariantTag {
        match self {
            Variant::Number(_) => VariantTag::Number,
            Variant::Boolean(_) => VariantTag::Boolean,
            Variant::Text(_) => VariantTag::Text,
            Variant::Empty => VariantTag::Empty,
        }
    }

    /// Numeric payload, or `0.0` for every non-number tag.
    pub fn as_number(&self) -> f64 {
        match self {
            Variant::Number(n) => *n,
            _ => 0.0,
        }
    }

    /// Read raw text the way the evaluator would: a number if it parses in
    /// invariant format, else a boolean for `true`/`false` (any case), else
    /// the text itself.
    pub fn interpret(text: &str) -> Variant {
        if let Ok(n) = text.parse::<f64>() {
            return Variant::Number(n);
        }
        match text.to_ascii_lowercase().as_str() {
            "true" => Variant::Boolean(true),
            "false" => Variant::Boolean(false),
            _ => Variant::Text(text.to_string()),
        }
    }

    /// Three-way comparison: `-1` less, `0` equal, `1` greater.
    ///
    /// Values of different tags compare as "not equal" (`-1`), never as an
    /// error. Same-tag rules: numbers by IEEE ordering (incomparable pairs
    /// count as not equal), booleans with `false < true`, text
    /// case-insensitively.
    pub fn compare(&self, other: &Variant) -> i32 {
        use std::cmp::Ordering;
        let ordering = match (self, other) {
            (Variant::Number(a), Variant::Number(b)) => match a.partial_cmp(b) {
                Some(ord) => ord,
                None => return -1,
            },
            (Variant::Boolean(a), Variant::Boolean(b)) => a.cmp(b),
            (Variant::Text(a), Variant::Text(b)) => {
                a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase())
            }
            (Variant::Empty, Variant::Empty) => Ordering::Equal,
            _ => return -1,
        };
        match ordering {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Number(n) => write!(f, "{n}"),
            Variant::Boolean(b) => write!(f, "{b}"),
            Variant::Text(s) => write!(f, "{s}"),
            Variant::Empty => Ok(()),
        }
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Variant::Number(value)
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Variant::Boolean(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::Text(value.to_string())
    }
}

/* ───────────────────────── VariantList ────────────────────────── */

/// Ordered argument vector handed to functions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantList(Vec<Variant>);

impl VariantList {
    pub fn new() -> Self {
        VariantList(Vec::new())
    }

    pub fn push(&mut self, value: Variant) {
        self.0.push(value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Variant> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variant> {
        self.0.iter()
    }

    /// Numeric payload of the argument at `index`, `0.0` when the argument
    /// is absent or not a number.
    pub fn double(&self, index: usize) -> f64 {
        self.0.get(index).map_or(0.0, Variant::as_number)
    }

    /// Precondition check for builtins: at least `expected.len()` arguments
    /// whose leading tags match.
    pub fn assert(&self, expected: &[VariantTag]) -> Result<(), CalcError> {
        if self.0.len() < expected.len() {
            return Err(CalcError::new(format!(
                "expected {} parameters",
                expected.len()
            )));
        }
        for (i, tag) in expected.iter().enumerate() {
            if self.0[i].tag() != *tag {
                return Err(CalcError::new(format!(
                    "parameter {} is not of type {tag}",
                    i + 1
                )));
            }
        }
        Ok(())
    }

    /// Collect the numeric view of the arguments: number payloads plus text
    /// entries that parse as numbers. Everything else is dropped.
    pub fn to_double_array(&self) -> Vec<f64> {
        self.0
            .iter()
            .filter_map(|v| match v {
                Variant::Number(n) => Some(*n),
                Variant::Text(s) => s.trim().parse().ok(),
                _ => None,
            })
            .collect()
    }
}

impl From<Vec<Variant>> for VariantList {
    fn from(values: Vec<Variant>) -> Self {
        VariantList(values)
    }
}

impl FromIterator<Variant> for VariantList {
    fn from_iter<I: IntoIterator<Item = Variant>>(iter: I) -> Self {
        VariantList(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_tag_comparison_is_not_equal() {
        let pairs = [
            (Variant::Number(1.0), Variant::Boolean(true)),
            (Variant::Number(0.0), Variant::Text("0".into())),
            (Variant::Boolean(false), Variant::Empty),
        ];
        for (a, b) in pairs {
            assert_eq!(a.compare(&b), -1, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn same_tag_ordering() {
        assert_eq!(Variant::Number(1.0).compare(&Variant::Number(2.0)), -1);
        assert_eq!(Variant::Number(2.0).compare(&Variant::Number(2.0)), 0);
        assert_eq!(Variant::Number(3.0).compare(&Variant::Number(2.0)), 1);
        assert_eq!(
            Variant::Boolean(false).compare(&Variant::Boolean(true)),
            -1
        );
        assert_eq!(
            Variant::Text("True".into()).compare(&Variant::Text("true".into())),
            0,
            "text compares case-insensitively"
        );
        assert_eq!(Variant::Number(f64::NAN).compare(&Variant::Number(1.0)), -1);
    }

    #[test]
    fn interpret_reads_numbers_bools_then_text() {
        assert_eq!(Variant::interpret("2.5"), Variant::Number(2.5));
        assert_eq!(Variant::interpret("-4"), Variant::Number(-4.0));
        assert_eq!(Variant::interpret("True"), Variant::Boolean(true));
        assert_eq!(Variant::interpret("FALSE"), Variant::Boolean(false));
        assert_eq!(Variant::interpret("abc"), Variant::Text("abc".into()));
    }

    #[test]
    fn double_access_coerces_non_numbers_to_zero() {
        let args: VariantList = vec![
            Variant::Number(4.0),
            Variant::Text("7".into()),
            Variant::Boolean(true),
        ]
        .into();
        assert_eq!(args.double(0), 4.0);
        assert_eq!(args.double(1), 0.0, "text has no number payload");
        assert_eq!(args.double(2), 0.0);
        assert_eq!(args.double(9), 0.0, "out of range reads as zero");
    }

    #[test]
    fn to_double_array_keeps_numbers_and_numeric_text() {
        let args: VariantList = vec![
            Variant::Number(1.0),
            Variant::Text("2.5".into()),
            Variant::Text("x".into()),
            Variant::Boolean(true),
            Variant::Empty,
        ]
        .into();
        assert_eq!(args.to_double_array(), vec![1.0, 2.5]);
    }

    #[test]
    fn assert_checks_count_then_tags() {
        let args: VariantList = vec![Variant::Number(1.0), Variant::Text("x".into())].into();
        assert!(args.assert(&[VariantTag::Number]).is_ok());
        assert!(args.assert(&[VariantTag::Number, VariantTag::Text]).is_ok());

        let err = args
            .assert(&[VariantTag::Number, VariantTag::Number, VariantTag::Number])
            .unwrap_err();
        assert_eq!(err.message(), "expected 3 parameters");

        let err = args
            .assert(&[VariantTag::Number, VariantTag::Number])
            .unwrap_err();
        assert_eq!(err.message(), "parameter 2 is not of type number");
    }
}
