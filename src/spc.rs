//! Parsing of Stock Plan Confirmation (SPC) sale books.
//!
//! A sale book is a workbook with two sheets. The first summarises the sale
//! order and its proceeds, laid out as two key/value tables side by side.
//! The second lists the RSU or ESPP lots the sold shares came from.

mod book;
mod detail;
mod error;
mod sale;
mod xlate;

pub use self::book::*;
pub use self::detail::*;
pub use self::error::*;
pub use self::sale::*;
pub use self::xlate::*;
