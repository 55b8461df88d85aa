use crate::sheet::TableError;

use super::{PlanType, XlateError};

/// A single sheet couldn't be parsed.
#[derive(thiserror::Error, PartialEq, Eq, Clone, Debug)]
pub enum SheetParseError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Xlate(#[from] XlateError),
    #[error("Non-unique heading(s) detected: {}", .0.join(", "))]
    DuplicateHeading(Vec<String>),
    #[error("Sheet has no {0}")]
    NoContent(&'static str),
}

/// The given book can't be parsed as a sale book.
///
/// Wraps all the sheet level errors, so callers iterating over many books
/// can skip a bad one.
#[derive(thiserror::Error, PartialEq, Eq, Clone, Debug)]
pub enum BookParseError {
    #[error("Could not read workbook: {0}")]
    Read(String),
    #[error("Workbook has no sheet {0}")]
    MissingSheet(usize),
    #[error("Sale sheet: {0}")]
    SaleSheet(#[source] SheetParseError),
    #[error("{plan_type} sheet: {source}")]
    DetailSheet {
        plan_type: PlanType,
        source: SheetParseError,
    },
    #[error("Couldn't determine sale type of book")]
    UnknownSaleType,
}
