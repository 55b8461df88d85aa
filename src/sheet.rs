//! The in-memory spreadsheet model, and generic operations for cleaning up
//! human-formatted grids into something more regular.

mod cell;
mod table;

pub use self::cell::*;
pub use self::table::*;
