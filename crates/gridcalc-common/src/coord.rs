//! Cell-address codec shared by the preprocessors and the host seam.
//!
//! Columns use the bijective base-26 letter encoding spreadsheets use:
//! 1 → `A`, 26 → `Z`, 27 → `AA`. Rows are plain 1-based integers. The
//! canonical textual form is uppercase letters followed by the row number.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parsed cell address: 1-based column index plus 1-based row number.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct CellAddr {
    col: u32,
    row: u32,
}

impl CellAddr {
    /// Construct from 1-based parts. Returns `None` when either index is 0.
    pub fn new(col: u32, row: u32) -> Option<Self> {
        if col == 0 || row == 0 {
            return None;
        }
        Some(CellAddr { col, row })
    }

    /// Parse a token of the shape `^[A-Za-z]+[1-9][0-9]*$`.
    ///
    /// Letters are accepted in either case and normalised to uppercase for
    /// the column decode; anything else (missing digits, leading zero row,
    /// trailing garbage) is not an address.
    pub fn parse(token: &str) -> Option<Self> {
        let split = token
            .bytes()
            .position(|b| !b.is_ascii_alphabetic())
            .unwrap_or(token.len());
        if split == 0 || split == token.len() {
            return None;
        }
        let (letters, digits) = token.split_at(split);
        if !digits.bytes().all(|b| b.is_ascii_digit()) || digits.starts_with('0') {
            return None;
        }
        let col = letters_to_column(&letters.to_ascii_uppercase())?;
        let row = digits.parse().ok()?;
        CellAddr::new(col, row)
    }

    #[inline(always)]
    pub fn col(self) -> u32 {
        self.col
    }

    #[inline(always)]
    pub fn row(self) -> u32 {
        self.row
    }
}

impl fmt::Display for CellAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_to_letters(self.col), self.row)
    }
}

/// Encode a 1-based column index as letters. `col` must be >= 1.
pub fn column_to_letters(mut col: u32) -> String {
    debug_assert!(col >= 1, "column indices are 1-based");
    let mut buf = Vec::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        buf.push(b'A' + rem);
        col = (col - 1) / 26;
    }
    buf.reverse();
    String::from_utf8(buf).expect("only ASCII A-Z")
}

/// Decode uppercase letters into the 1-based column index.
pub fn letters_to_column(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for ch in s.bytes() {
        if !ch.is_ascii_uppercase() {
            return None;
        }
        col = col.checked_mul(26)?.checked_add((ch - b'A') as u32 + 1)?;
    }
    Some(col)
}
