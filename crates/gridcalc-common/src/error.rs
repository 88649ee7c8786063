//! Calculator error representation.
//!
//! The engine reports every failure through a single kind: a human-readable
//! message, optionally tagged with the cell address the failure originated
//! from. Preprocessors, the reducer and the builtins all converge on this
//! type, so host code has exactly one thing to catch.

use std::{error::Error, fmt};

/// The one failure type of the calculator.
///
/// Build with [`CalcError::new`] and attach a cell tag with
/// [`CalcError::with_cell`] when the failure is tied to a specific address:
///
/// ```
/// use gridcalc_common::CalcError;
///
/// let err = CalcError::new("invalid parameter").with_cell("A1");
/// assert_eq!(err.to_string(), "invalid parameter at cell A1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CalcError {
    message: String,
    cell: Option<String>,
}

impl CalcError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        CalcError {
            message: message.into(),
            cell: None,
        }
    }

    /// Attach the cell address the failure originated from.
    pub fn with_cell<S: Into<String>>(mut self, cell: S) -> Self {
        self.cell = Some(cell.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cell(&self) -> Option<&str> {
        self.cell.as_deref()
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref cell) = self.cell {
            write!(f, " at cell {cell}")?;
        }
        Ok(())
    }
}

impl Error for CalcError {}

impl From<CalcError> for String {
    fn from(error: CalcError) -> Self {
        format!("{error}")
    }
}
