//! The embeddable calculator: owned tables, the registration API and the
//! expression entry points.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use gridcalc_common::{CalcError, VariantList};
use gridcalc_parse::{is_identifier, Tokenizer};

use crate::function::{CalcFn, FunctionFactory};
use crate::operators::OperatorTable;
use crate::traits::CellProvider;

/// Mathematical constants preloaded into every new variable table.
const CONSTANTS: &[(&str, f64)] = &[
    ("pi", 3.14159265358979),
    ("tao", 6.28318530717959),
    ("e", 2.71828182845905),
    ("phi", 1.61803398874989),
    ("major", 0.61803398874989),
    ("minor", 0.38196601125011),
    ("pitograd", 57.2957795130823),
    ("piofgrad", 0.01745329251994),
];

/// A self-contained expression calculator for a table-like host.
///
/// Each instance owns its operator, variable and function tables; nothing
/// is shared globally. Evaluation is synchronous and single-threaded, and
/// `compute` takes `&mut self`, which also rules out re-entry from the
/// cell provider.
pub struct Calculator {
    pub(crate) operators: OperatorTable,
    pub(crate) variables: FxHashMap<String, f64>,
    pub(crate) functions: FxHashMap<String, CalcFn>,
    pub(crate) builtins: FunctionFactory,
    pub(crate) provider: Option<Box<dyn CellProvider>>,
    variable_declarator: String,
}

impl Calculator {
    pub fn new() -> Self {
        let mut variables = FxHashMap::default();
        for (name, value) in CONSTANTS {
            variables.insert((*name).to_string(), *value);
        }
        Calculator {
            operators: OperatorTable::with_builtins(),
            variables,
            functions: FxHashMap::default(),
            builtins: FunctionFactory::new(),
            provider: None,
            variable_declarator: "let".to_string(),
        }
    }

    /// Evaluate an expression to a number.
    pub fn compute(&mut self, expression: &str) -> Result<f64, CalcError> {
        let tokenizer = Tokenizer::new(self.operators.symbols());
        let mut tokens = tokenizer.tokenize(expression);
        self.substitute_tokens(&mut tokens)?;
        self.normalize_countif(&mut tokens);
        self.rewrite_relative_cells(&mut tokens)?;
        self.expand_ranges(&mut tokens)?;
        self.evaluate_tokens(tokens)
    }

    /// Script-flavoured entry point: strips comments, fixes common typos
    /// and recognises variable declarations before delegating to
    /// [`compute`](Self::compute). Equivalent to
    /// `programmatically_parse_with(expression, true, true)`.
    pub fn programmatically_parse(&mut self, expression: &str) -> Result<f64, CalcError> {
        self.programmatically_parse_with(expression, true, true)
    }

    pub fn programmatically_parse_with(
        &mut self,
        expression: &str,
        correct: bool,
        identify_comments: bool,
    ) -> Result<f64, CalcError> {
        let mut expr = expression.to_string();
        if identify_comments {
            expr = strip_comments(&expr);
        }
        if correct {
            expr = correct_typos(&expr);
        }
        let line = expr.trim();
        if let Some((name, rhs)) = self.parse_declaration(line) {
            let value = self.compute(&rhs)?;
            self.set_variable(name, value);
            return Ok(value);
        }
        self.compute(line)
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: f64) {
        self.variables.insert(name.into(), value);
    }

    /// Current value of a variable, NaN when it was never set.
    pub fn get_variable(&self, name: &str) -> f64 {
        self.variables.get(name).copied().unwrap_or(f64::NAN)
    }

    /// Register a user function. Lookup is case-sensitive and wins over the
    /// built-in of the same name.
    pub fn add_function<F>(&mut self, name: impl Into<String>, function: F)
    where
        F: Fn(&VariantList) -> f64 + 'static,
    {
        self.functions
            .insert(name.into(), Arc::new(move |args| Ok(function(args))));
    }

    /// Register a binary operator at the lowest precedence (or replace an
    /// existing symbol in place).
    pub fn add_operator<F>(&mut self, symbol: impl Into<String>, op: F)
    where
        F: Fn(f64, f64) -> f64 + 'static,
    {
        self.operators.add(symbol, op);
    }

    /// Install the host callback that supplies cell contents.
    pub fn set_cell_provider(&mut self, provider: impl CellProvider + 'static) {
        self.provider = Some(Box::new(provider));
    }

    /// Keyword that opens a variable declaration in
    /// [`programmatically_parse`](Self::programmatically_parse). Defaults
    /// to `"let"`.
    pub fn variable_declarator(&self) -> &str {
        &self.variable_declarator
    }

    pub fn set_variable_declarator(&mut self, keyword: impl Into<String>) {
        self.variable_declarator = keyword.into();
    }

    pub(crate) fn resolve_function(&mut self, name: &str) -> Option<CalcFn> {
        if let Some(f) = self.functions.get(name) {
            return Some(Arc::clone(f));
        }
        self.builtins.resolve(name)
    }

    /// `let a = X` / `let a be X` / `let a := X` / `a := X`. The declarator
    /// keyword and the separator must stand alone between whitespace.
    fn parse_declaration(&self, line: &str) -> Option<(String, String)> {
        if let Some(rest) = strip_keyword(line, &self.variable_declarator) {
            return [":=", "be", "="]
                .into_iter()
                .find_map(|sep| split_declaration(rest, sep));
        }
        split_declaration(line, ":=")
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Calculator::new()
    }
}

fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if rest.chars().next()?.is_whitespace() {
        Some(rest)
    } else {
        None
    }
}

/// `NAME <sep> EXPR` with a single-word name; the expression keeps its own
/// spacing only as far as re-tokenization cares, which is not at all.
fn split_declaration(input: &str, separator: &str) -> Option<(String, String)> {
    let mut words = input.split_whitespace();
    let name = words.next()?;
    if !is_identifier(name) || words.next()? != separator {
        return None;
    }
    let rhs = words.collect::<Vec<_>>().join(" ");
    if rhs.is_empty() {
        return None;
    }
    Some((name.to_string(), rhs))
}

/// Remove `#{ … }#` blocks, then `#` line comments.
fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("#{") {
        out.push_str(&rest[..start]);
        match rest[start..].find("}#") {
            Some(end) => rest = &rest[start + end + 2..],
            // an unterminated block swallows the tail
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);

    let mut cleaned = String::with_capacity(out.len());
    for (i, line) in out.lines().enumerate() {
        if i > 0 {
            cleaned.push('\n');
        }
        match line.find('#') {
            Some(pos) => cleaned.push_str(&line[..pos]),
            None => cleaned.push_str(line),
        }
    }
    cleaned
}

/// Whole-word, case-insensitive typo fixes: `sqr` → `sqrt`,
/// `arctan2` → `atan2`.
fn correct_typos(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            match word.to_ascii_lowercase().as_str() {
                "sqr" => out.push_str("sqrt"),
                "arctan2" => out.push_str("atan2"),
                _ => out.push_str(&word),
            }
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}
