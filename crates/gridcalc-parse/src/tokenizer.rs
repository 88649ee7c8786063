//! Expression scanner: raw text to a flat, ordered token list.
//!
//! Tokens deliberately stay plain strings. Downstream layers classify them
//! by inspection and rewrite the list in place, so there is no token type
//! to keep in sync with the rewrites. The scanner normalises multi-char
//! comparison operators to single code points, folds signs into numeric
//! literals and inserts the `*` that implicit multiplication implies.

/// Literal rewrites applied to the raw expression before scanning, in order.
/// `≥`/`≤`/`≠` are U+2265 / U+2264 / U+2260.
const PRE_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("+-", "-"),
    ("-+", "-"),
    ("--", "+"),
    ("==", "="),
    (">=", "\u{2265}"),
    ("<=", "\u{2264}"),
    ("!=", "\u{2260}"),
];

/// A token is a number when it parses as an invariant-format double.
pub fn is_number(token: &str) -> bool {
    token.parse::<f64>().is_ok()
}

/// ASCII letter followed by ASCII letters and digits.
pub fn is_identifier(token: &str) -> bool {
    let mut bytes = token.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() => bytes.all(|b| b.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// The scanner. It needs the registered operator symbols to decide whether
/// a `+`/`-` after the previous token is a sign or an operator.
pub struct Tokenizer {
    operators: Vec<String>,
}

impl Tokenizer {
    pub fn new<I, S>(operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Tokenizer {
            operators: operators.into_iter().map(Into::into).collect(),
        }
    }

    fn is_operator(&self, token: &str) -> bool {
        self.operators.iter().any(|op| op == token)
    }

    /// Scan `expression` into tokens. The scanner itself never fails;
    /// ill-formed numbers surface later, when a downstream layer parses the
    /// token.
    pub fn tokenize(&self, expression: &str) -> Vec<String> {
        let mut expr = expression.to_string();
        for (pattern, replacement) in PRE_SUBSTITUTIONS {
            expr = expr.replace(pattern, replacement);
        }

        let chars: Vec<char> = expr.chars().collect();
        let mut tokens: Vec<String> = Vec::new();
        // Last non-whitespace character consumed; this is the "preceding
        // context" the implicit-`*` and sign-folding rules look at, which
        // keeps tokenization whitespace-insensitive.
        let mut prev: Option<char> = None;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if c.is_whitespace() {
                i += 1;
                continue;
            }

            if c.is_ascii_alphabetic() {
                if matches!(prev, Some(p) if p.is_ascii_digit() || p == ')') {
                    tokens.push("*".to_string());
                }
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                tokens.push(chars[start..i].iter().collect());
                prev = Some(chars[i - 1]);
                continue;
            }

            if c.is_ascii_digit() || c == '.' {
                // a literal right after a closing paren is a product too
                if prev == Some(')') {
                    tokens.push("*".to_string());
                }
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                tokens.push(chars[start..i].iter().collect());
                prev = Some(chars[i - 1]);
                continue;
            }

            if (c == '+' || c == '-')
                && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())
                && (prev.is_none()
                    || prev == Some('(')
                    || tokens.last().is_some_and(|t| self.is_operator(t)))
            {
                let start = i;
                i += 1;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                tokens.push(chars[start..i].iter().collect());
                prev = Some(chars[i - 1]);
                continue;
            }

            if c == '(' {
                if matches!(prev, Some(p) if p.is_ascii_digit() || p == ')') {
                    tokens.push("*".to_string());
                }
                tokens.push("(".to_string());
                prev = Some('(');
                i += 1;
                continue;
            }

            tokens.push(c.to_string());
            prev = Some(c);
            i += 1;
        }

        tokens
    }
}
