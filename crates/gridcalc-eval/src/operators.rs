//! Binary operator table and the flat arithmetic reducer.
//!
//! Precedence is the insertion order of the table, not a numeric level:
//! the reducer walks the entries front to back and, for each symbol,
//! collapses its leftmost occurrence until none remain. Host-registered
//! operators are appended at the tail and therefore bind loosest.

use std::sync::Arc;

use gridcalc_common::CalcError;

/// Absolute tolerance used by the equality family (`=`, `≥`, `≤`, `≠`).
pub const EQ_TOLERANCE: f64 = 1e-8;

pub type BinaryOp = Arc<dyn Fn(f64, f64) -> f64>;

#[inline]
fn truth(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

#[inline]
fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EQ_TOLERANCE
}

/// Parse a token at its point of use. Anything that survived substitution
/// without becoming a number is an unknown name.
pub(crate) fn parse_number(token: &str) -> Result<f64, CalcError> {
    token
        .parse::<f64>()
        .map_err(|_| CalcError::new(format!("variable {token} is undefined")))
}

/// Format a value back into a token, invariant culture.
pub(crate) fn fmt_number(value: f64) -> String {
    format!("{value}")
}

/// Ordered mapping from operator symbol to its function.
pub struct OperatorTable {
    entries: Vec<(String, BinaryOp)>,
}

impl OperatorTable {
    /// The built-in table, tightest first: `^ % / * - + > < ≥ ≤ ≠ =`.
    pub fn with_builtins() -> Self {
        let mut table = OperatorTable {
            entries: Vec::new(),
        };
        table.add("^", |a, b| a.powf(b));
        table.add("%", |a, b| a % b);
        table.add("/", |a, b| a / b);
        table.add("*", |a, b| a * b);
        table.add("-", |a, b| a - b);
        table.add("+", |a, b| a + b);
        table.add(">", |a, b| truth(a > b));
        table.add("<", |a, b| truth(a < b));
        table.add("\u{2265}", |a, b| truth(a > b || approx_eq(a, b)));
        table.add("\u{2264}", |a, b| truth(a < b || approx_eq(a, b)));
        table.add("\u{2260}", |a, b| truth(!approx_eq(a, b)));
        table.add("=", |a, b| truth(approx_eq(a, b)));
        table
    }

    /// Register `op` under `symbol`. A new symbol lands at the tail (lowest
    /// precedence); re-adding an existing one replaces the function but
    /// keeps its precedence slot.
    pub fn add<F>(&mut self, symbol: impl Into<String>, op: F)
    where
        F: Fn(f64, f64) -> f64 + 'static,
    {
        let symbol = symbol.into();
        let op: BinaryOp = Arc::new(op);
        match self.entries.iter_mut().find(|(s, _)| *s == symbol) {
            Some(entry) => entry.1 = op,
            None => self.entries.push((symbol, op)),
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.iter().any(|(s, _)| s == symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<&BinaryOp> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, op)| op)
    }

    /// Symbols in precedence order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    /// Reduce a flat list of number and operator tokens to one value.
    ///
    /// The list must be paren-free; the evaluator guarantees that by
    /// collapsing innermost groups first.
    pub fn reduce(&self, tokens: &mut Vec<String>) -> Result<f64, CalcError> {
        if tokens.is_empty() {
            return Ok(0.0);
        }
        if tokens.len() == 1 {
            return parse_number(&tokens[0]);
        }
        if tokens.len() == 2 {
            // unary sign, or a lone operator applied against zero
            if tokens[0] == "-" || tokens[0] == "+" {
                if tokens[0] == "+" || tokens[1].starts_with('-') {
                    return parse_number(&tokens[1]);
                }
                return parse_number(&format!("-{}", tokens[1]));
            }
            let op = self.get(&tokens[0]).ok_or_else(|| {
                CalcError::new(format!("operator {} is not defined", tokens[0]))
            })?;
            return Ok(op(0.0, parse_number(&tokens[1])?));
        }

        for (symbol, op) in &self.entries {
            while let Some(pos) = tokens.iter().position(|t| t == symbol) {
                if pos == 0 {
                    // leading operator applies against an implicit zero
                    let rhs = parse_number(&tokens[1])?;
                    let value = op(0.0, rhs);
                    tokens.splice(0..2, [fmt_number(value)]);
                } else {
                    let rhs_token = tokens.get(pos + 1).cloned().unwrap_or_default();
                    let lhs = parse_number(&tokens[pos - 1])?;
                    let rhs = parse_number(&rhs_token)?;
                    let value = op(lhs, rhs);
                    tokens.splice(pos - 1..=pos + 1, [fmt_number(value)]);
                }
                if tokens.len() == 1 {
                    return parse_number(&tokens[0]);
                }
            }
        }
        parse_number(&tokens[0])
    }
}
