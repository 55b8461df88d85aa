//! Tab or comma separated text exports of a single sheet.
//!
//! Every field is read as text, as there is no typing in these files.
//! Conversion happens later, in the same places it does for cells decoded
//! from real workbooks.

use std::io::Read;
use std::path::Path;

use crate::sheet::{Cell, Row, Table};

use super::Error;

pub fn read_delimited(r: impl Read, delimiter: u8) -> Result<Table, Error> {
    let mut csv_r = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        // Quotes have no special meaning in the tab separated exports.
        .quoting(delimiter != b'\t')
        .from_reader(r);

    let mut table = Table::new();
    for (i, record_res) in csv_r.records().enumerate() {
        let record = record_res.map_err(|e| format!("Error reading row {}: {}", i + 1, e))?;
        let row: Row = record.iter().map(|f| Some(Cell::text(f))).collect();
        table.push(row);
    }
    Ok(table)
}

pub fn read_delimited_file(path: &Path, delimiter: u8) -> Result<Table, Error> {
    let fp = std::fs::File::open(path)
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
    read_delimited(fp, delimiter).map_err(|e| format!("{}: {}", path.display(), e))
}
