use std::borrow::Borrow;

use tracing::trace;

use super::cell::{cell_eq_str, cell_is_blank, cell_is_truthy, Cell, Row, Table};

#[derive(thiserror::Error, PartialEq, Eq, Clone, Debug)]
pub enum TableError {
    #[error("Couldn't find column named '{0}'")]
    HeadingNotFound(String),
    #[error("Row {row} is not a key/value pair (found {width} cells)")]
    NotKeyValue { row: usize, width: usize },
}

/// Get a copy of the Table where all rows are the same width.
/// Short rows are padded on the right with `fill`.
pub fn rows_same_width(rows: &[Row], fill: Option<Cell>) -> Table {
    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    rows.iter()
        .map(|row| {
            let mut r = row.clone();
            r.resize(width, fill.clone());
            r
        })
        .collect()
}

/// Get a copy of the Table without rows where every cell is falsy.
pub fn without_empty_rows(rows: &[Row]) -> Table {
    rows.iter()
        .filter(|row| row.iter().any(cell_is_truthy))
        .cloned()
        .collect()
}

/// Zip semantics: the transpose is only as wide as the shortest row.
fn transpose(rows: &[Row]) -> Table {
    let width = match rows.iter().map(|r| r.len()).min() {
        Some(w) => w,
        None => return Vec::new(),
    };
    (0..width)
        .map(|col| rows.iter().map(|row| row[col].clone()).collect())
        .collect()
}

/// Get a copy of the Table without columns where every cell is falsy.
///
/// Expects a rectangular table (see rows_same_width). Ragged input is
/// truncated to its shortest row.
/// If every column is empty, the result has no rows at all.
pub fn without_empty_columns(rows: &[Row]) -> Table {
    let cols = without_empty_rows(&transpose(rows));
    transpose(&cols)
}

/// Find the column with the given heading in the first row, and split every
/// row at that column.
///
/// The sale sheet has two tables placed side-by-side for easy reading,
/// which need to be stacked one atop the other for our purposes. The left
/// half of each pair excludes the heading column, the right half starts
/// with it.
pub fn split_table_at_heading<'a>(
    table: &'a [Row],
    heading: &str,
    remove_heading: bool,
) -> Result<impl Iterator<Item = (Row, Row)> + 'a, TableError> {
    let first = table
        .first()
        .ok_or_else(|| TableError::HeadingNotFound(heading.to_string()))?;
    let col_index = first
        .iter()
        .position(|c| cell_eq_str(c, heading))
        .ok_or_else(|| TableError::HeadingNotFound(heading.to_string()))?;
    trace!(heading, col_index, "split_table_at_heading");

    let skip = if remove_heading { 1 } else { 0 };
    Ok(table.iter().skip(skip).map(move |row| {
        let at = col_index.min(row.len());
        (row[..at].to_vec(), row[at..].to_vec())
    }))
}

/// Merge the two halves produced by split_table_at_heading into a single
/// table, dropping empty rows from each half. Left rows come first.
pub fn to_single_table<I>(pairs: I) -> Table
where
    I: IntoIterator<Item = (Row, Row)>,
{
    let (table_a, table_b): (Table, Table) = pairs.into_iter().unzip();
    let mut single = without_empty_rows(&table_a);
    single.extend(without_empty_rows(&table_b));
    single
}

/// Normalize a raw row for content_rows: absent cells become empty text,
/// and text is trimmed.
fn stripped_row(row: &Row) -> Row {
    row.iter()
        .map(|c| match c {
            None => Some(Cell::Text(String::new())),
            Some(Cell::Text(s)) => Some(Cell::Text(s.trim().to_string())),
            Some(other) => Some(other.clone()),
        })
        .collect()
}

/// Lazy iterator over the content window of a sheet.
/// See content_rows.
pub struct ContentRows<I> {
    rows: I,
    reading: bool,
    done: bool,
}

impl<I> Iterator for ContentRows<I>
where
    I: Iterator,
    I::Item: Borrow<Row>,
{
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if self.done {
            return None;
        }
        for raw in self.rows.by_ref() {
            let row = stripped_row(Borrow::<Row>::borrow(&raw));
            if !self.reading {
                if row.first().map(cell_is_blank).unwrap_or(true) {
                    // Still in the letterhead
                    continue;
                }
                self.reading = true;
            }
            if !row.iter().any(cell_is_truthy) {
                self.done = true;
                return None;
            }
            return Some(row);
        }
        self.done = true;
        None
    }
}

/// Get the content block from a sheet with free text above and below it.
///
/// Content starts at the first row with something in its leftmost cell,
/// and ends (exclusive) at the next completely empty row.
pub fn content_rows<I>(rows: I) -> ContentRows<I::IntoIter>
where
    I: IntoIterator,
    I::Item: Borrow<Row>,
{
    ContentRows {
        rows: rows.into_iter(),
        reading: false,
        done: false,
    }
}
