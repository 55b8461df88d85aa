use std::fmt::Display;

use rust_decimal::Decimal;
use time::Date;

/// A single, already-decoded spreadsheet cell.
///
/// Absence is not a variant. Cells which are absent in the source grid are
/// `None` in a `Row`, which is distinct from `Some(Cell::Text(""))`.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Cell {
    Text(String),
    Int(i64),
    Decimal(Decimal),
    Date(Date),
}

pub type Row = Vec<Option<Cell>>;
pub type Table = Vec<Row>;

impl Cell {
    pub fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Text which is empty, and numbers equal to zero, are "falsy".
    /// Dates are always truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Cell::Text(s) => !s.is_empty(),
            Cell::Int(i) => *i != 0,
            Cell::Decimal(d) => !d.is_zero(),
            Cell::Date(_) => true,
        }
    }

    /// Like is_truthy, but text consisting only of whitespace is also blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Text(s) => s.trim().is_empty(),
            _ => !self.is_truthy(),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Decimal(d) => write!(f, "{}", d),
            Cell::Date(d) => write!(f, "{}", d),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Cell::Decimal(value)
    }
}

impl From<Date> for Cell {
    fn from(value: Date) -> Self {
        Cell::Date(value)
    }
}

pub fn cell_is_truthy(c: &Option<Cell>) -> bool {
    c.as_ref().map(|c| c.is_truthy()).unwrap_or(false)
}

pub fn cell_is_blank(c: &Option<Cell>) -> bool {
    c.as_ref().map(|c| c.is_blank()).unwrap_or(true)
}

pub fn cell_eq_str(c: &Option<Cell>, s: &str) -> bool {
    c.as_ref().and_then(Cell::as_str) == Some(s)
}

/// All sheets of a workbook, in order. Sheet 0 is the first sheet.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Workbook {
    pub sheets: Vec<Table>,
}

impl Workbook {
    pub fn new(sheets: Vec<Table>) -> Workbook {
        Workbook { sheets }
    }

    pub fn sheet(&self, index: usize) -> Option<&Table> {
        self.sheets.get(index)
    }
}

// Convenience for building rows in tests.
// Empty strings become blank text cells (not absent cells), which is how
// most decoders present untouched cells within the used range.
#[macro_export]
macro_rules! row {
    ($($cell:expr),* $(,)?) => {{
        let r: $crate::sheet::Row = vec![$(Some($crate::sheet::Cell::from($cell))),*];
        r
    }};
}
