//! Inside-out evaluation over the flat token list.
//!
//! The innermost parenthesized group is always the last `(`; it is either
//! a plain sub-expression or, when an identifier precedes it, a function
//! call. Either way it collapses to a single token and the scan repeats
//! until only a flat arithmetic list remains.

use gridcalc_common::{CalcError, Variant, VariantList};
use gridcalc_parse::is_number;

use crate::calculator::Calculator;
use crate::operators::fmt_number;

impl Calculator {
    pub(crate) fn evaluate_tokens(&mut self, mut tokens: Vec<String>) -> Result<f64, CalcError> {
        while let Some(open) = tokens.iter().rposition(|t| t == "(") {
            let close = tokens[open + 1..]
                .iter()
                .position(|t| t == ")")
                .map(|p| p + open + 1)
                .ok_or_else(|| CalcError::new("no closing bracket"))?;

            let mut inner: Vec<String> = tokens[open + 1..close].to_vec();
            let callee = if open > 0 {
                let name = tokens[open - 1].clone();
                self.resolve_function(&name).map(|f| (name, f))
            } else {
                None
            };

            let is_call = callee.is_some();
            let value = match callee {
                None => self.operators.reduce(&mut inner)?,
                Some((name, function)) => {
                    let args = self.shape_arguments(&name, inner)?;
                    function(&args)?
                }
            };

            let result = fmt_number(value);
            if is_call {
                // a call consumes its name token as well
                tokens.splice(open - 1..=close, [result]);
            } else {
                tokens.splice(open..=close, [result]);
            }
        }
        self.operators.reduce(&mut tokens)
    }

    /// Shape the group's tokens into the argument list for `name`.
    ///
    /// No comma: the whole group is one arithmetic argument. With commas,
    /// each slice reduces independently; `countif` keeps single non-numeric
    /// tokens as text so its matcher and raw cell values survive.
    fn shape_arguments(&self, name: &str, inner: Vec<String>) -> Result<VariantList, CalcError> {
        let mut args = VariantList::new();
        if inner.is_empty() {
            return Ok(args);
        }
        if !inner.iter().any(|t| t == ",") {
            let mut expr = inner;
            args.push(Variant::Number(self.operators.reduce(&mut expr)?));
            return Ok(args);
        }
        let keep_text = name.eq_ignore_ascii_case("countif");
        for slice in inner.split(|t| t == ",") {
            if keep_text && slice.len() == 1 && !is_number(&slice[0]) {
                args.push(Variant::Text(slice[0].clone()));
            } else {
                let mut expr = slice.to_vec();
                args.push(Variant::Number(self.operators.reduce(&mut expr)?));
            }
        }
        Ok(args)
    }
}
