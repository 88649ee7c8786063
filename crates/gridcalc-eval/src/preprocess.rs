//! In-place token rewrites that run between tokenization and evaluation.
//!
//! Order matters: variables and lone cell references are inlined first,
//! then `countif` arguments are normalized, then `cell(dc, dr)` collapses
//! to a concrete address, and finally `:` ranges expand into value lists.
//! Each layer reshapes tokens the next one depends on.

use gridcalc_common::{column_to_letters, CalcError, CellAddr};

use crate::calculator::Calculator;
use crate::operators::fmt_number;

impl Calculator {
    /// Replace variable tokens with their values and lone cell references
    /// with the host-provided contents. Range endpoints (a `:` neighbor)
    /// stay put for the range expander.
    pub(crate) fn substitute_tokens(&self, tokens: &mut Vec<String>) -> Result<(), CalcError> {
        for i in 0..tokens.len() {
            if let Some(value) = self.variables.get(tokens[i].as_str()) {
                tokens[i] = fmt_number(*value);
                continue;
            }
            let Some(addr) = CellAddr::parse(&tokens[i]) else {
                continue;
            };
            let next_is_colon = tokens.get(i + 1).map_or(false, |t| t == ":");
            let prev_is_colon = i > 0 && tokens[i - 1] == ":";
            if next_is_colon || prev_is_colon {
                continue;
            }
            tokens[i] = self.lookup_cell(addr)?;
        }
        Ok(())
    }

    /// Normalize `countif(range, op operand)` into
    /// `countif(range, code, op-operand)` so the builtin sees the relation
    /// as its second-to-last argument. Without an explicit comparator the
    /// injected code is `0` ("equals").
    pub(crate) fn normalize_countif(&self, tokens: &mut Vec<String>) {
        let mut i = 0;
        while i + 1 < tokens.len() {
            if !tokens[i].eq_ignore_ascii_case("countif") || tokens[i + 1] != "(" {
                i += 1;
                continue;
            }
            let Some(close) = position_from(tokens, i + 2, ")") else {
                i += 1;
                continue;
            };
            let Some(comma) = tokens[i + 2..close]
                .iter()
                .rposition(|t| t == ",")
                .map(|p| p + i + 2)
            else {
                i += 1;
                continue;
            };

            let code = match tokens[comma + 1].chars().next() {
                Some('>') => Some("1"),
                Some('<') => Some("-1"),
                Some('!') => Some("3"),
                _ => None,
            };
            match code {
                Some(code) => {
                    // keep the operand prefixed with its relation glyph
                    if comma + 2 < close {
                        let operand = tokens.remove(comma + 2);
                        tokens[comma + 1].push_str(&operand);
                    }
                    tokens.splice(
                        comma + 1..comma + 1,
                        [code.to_string(), ",".to_string()],
                    );
                }
                None => {
                    tokens.splice(
                        comma + 1..comma + 1,
                        ["0".to_string(), ",".to_string()],
                    );
                }
            }
            i += 1;
        }
    }

    /// Collapse every `cell(col_off, row_off)` into the address offset from
    /// the `col`/`row` variables.
    pub(crate) fn rewrite_relative_cells(
        &self,
        tokens: &mut Vec<String>,
    ) -> Result<(), CalcError> {
        loop {
            let Some(start) = (0..tokens.len().saturating_sub(1))
                .find(|&k| tokens[k].eq_ignore_ascii_case("cell") && tokens[k + 1] == "(")
            else {
                return Ok(());
            };
            let close = position_from(tokens, start + 2, ")")
                .ok_or_else(|| CalcError::new("no closing bracket"))?;

            let inner = &tokens[start + 2..close];
            let commas: Vec<usize> = inner
                .iter()
                .enumerate()
                .filter_map(|(k, t)| (t == ",").then_some(k))
                .collect();
            if commas.len() != 1 {
                return Err(CalcError::new("cell function must have two parameters"));
            }
            let (col, row) = match (self.variables.get("col"), self.variables.get("row")) {
                (Some(col), Some(row)) => (col.trunc() as i64, row.trunc() as i64),
                _ => return Err(CalcError::new("cell function requires col and row")),
            };

            let mut col_expr = inner[..commas[0]].to_vec();
            let mut row_expr = inner[commas[0] + 1..].to_vec();
            let col_off = self.operators.reduce(&mut col_expr)?.trunc() as i64;
            let row_off = self.operators.reduce(&mut row_expr)?.trunc() as i64;

            let col_idx = col + col_off;
            let row_idx = row + row_off;
            if col_idx < 1 || row_idx < 1 || col_idx > i64::from(u32::MAX) {
                return Err(CalcError::new(format!(
                    "invalid cell offset ({col_idx}, {row_idx})"
                )));
            }
            let addr = format!("{}{}", column_to_letters(col_idx as u32), row_idx);
            tokens.splice(start..=close, [addr]);
        }
    }

    /// Expand `addr : addr` windows into comma-separated host values. The
    /// endpoints must share a column or a row; iteration always runs from
    /// the smaller to the larger index.
    pub(crate) fn expand_ranges(&self, tokens: &mut Vec<String>) -> Result<(), CalcError> {
        let mut search = 0;
        while let Some(pos) = position_from(tokens, search, ":") {
            if pos == 0 || pos + 1 >= tokens.len() {
                return Err(CalcError::new("invalid range"));
            }
            let start = CellAddr::parse(&tokens[pos - 1])
                .ok_or_else(|| CalcError::new("undefined cell ref"))?;
            let end = CellAddr::parse(&tokens[pos + 1])
                .ok_or_else(|| CalcError::new("undefined cell ref"))?;

            let cells: Vec<CellAddr> = if start.col() == end.col() {
                let (lo, hi) = ordered(start.row(), end.row());
                (lo..=hi)
                    .filter_map(|r| CellAddr::new(start.col(), r))
                    .collect()
            } else if start.row() == end.row() {
                let (lo, hi) = ordered(start.col(), end.col());
                (lo..=hi)
                    .filter_map(|c| CellAddr::new(c, start.row()))
                    .collect()
            } else {
                return Err(CalcError::new("invalid cell range"));
            };

            let mut replacement = Vec::with_capacity(cells.len() * 2 - 1);
            for (k, addr) in cells.into_iter().enumerate() {
                if k > 0 {
                    replacement.push(",".to_string());
                }
                replacement.push(self.lookup_cell(addr)?);
            }
            search = pos - 1 + replacement.len();
            tokens.splice(pos - 1..=pos + 1, replacement);
        }
        Ok(())
    }

    /// Ask the host for a cell's contents; an absent answer is a failure at
    /// that address.
    pub(crate) fn lookup_cell(&self, addr: CellAddr) -> Result<String, CalcError> {
        let name = addr.to_string();
        match self.provider.as_deref().and_then(|p| p.cell_value(&name)) {
            Some(value) => Ok(value),
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(cell = %name, "cell provider returned no value");
                Err(CalcError::new("invalid parameter").with_cell(name))
            }
        }
    }
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn position_from(tokens: &[String], from: usize, needle: &str) -> Option<usize> {
    if from > tokens.len() {
        return None;
    }
    tokens[from..].iter().position(|t| t == needle).map(|p| p + from)
}
