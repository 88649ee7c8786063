//! Host-facing seams.

/// Supplies cell contents on demand.
///
/// The calculator calls this synchronously from inside `compute` whenever a
/// cell value is required, passing the canonical uppercase address (e.g.
/// `"A1"`). Returning `None` marks the cell unknown, which fails the
/// evaluation. Implementations must not re-enter the calculator.
pub trait CellProvider {
    fn cell_value(&self, addr: &str) -> Option<String>;
}

impl<F> CellProvider for F
where
    F: Fn(&str) -> Option<String>,
{
    fn cell_value(&self, addr: &str) -> Option<String> {
        self(addr)
    }
}
