//! The built-in function set.
//!
//! Each module registers its functions into the shared dispatch table under
//! canonical lowercase names; aliases point at the same implementation.

pub mod criteria;
pub mod numeric;
pub mod stats;
