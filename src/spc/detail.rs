//! The second sheet of a sale book, which lists the RSU releases or ESPP
//! purchases the sold shares came from.

use std::borrow::Borrow;

use tracing::trace;

use crate::sheet::{content_rows, without_empty_columns, Row, Table};

use super::{xlate_kv, Record, SheetParseError};

/// The header and data rows, without the letterhead above or the
/// footer below.
pub fn detail_sheet_relevant_rows<I>(rows: I) -> Table
where
    I: IntoIterator,
    I::Item: Borrow<Row>,
{
    content_rows(rows).collect()
}

/// The first row holds the headings. Every other row becomes a record.
pub fn detail_table_to_records(table: &[Row]) -> Result<Vec<Record>, SheetParseError> {
    let (headings, rows) = table
        .split_first()
        .ok_or(SheetParseError::NoContent("heading row"))?;
    let headings: Vec<String> = headings
        .iter()
        .map(|h| h.as_ref().map(|c| c.to_string()).unwrap_or_default())
        .collect();

    rows.iter()
        .map(|row| {
            let mut record = Record::new();
            for (heading, cell) in headings.iter().zip(row.iter()) {
                let (k, v) = xlate_kv(heading, cell.as_ref())?;
                record.insert(k.to_string(), v);
            }
            Ok(record)
        })
        .collect()
}

pub fn detail_sheet_to_records(sheet: &[Row]) -> Result<Vec<Record>, SheetParseError> {
    let rows = detail_sheet_relevant_rows(sheet);
    trace!("detail_sheet_to_records: {} content rows", rows.len());
    let rows = without_empty_columns(&rows);
    detail_table_to_records(&rows)
}

/// Records of the RSU releases involved in a sale.
pub fn rsu_sheet_to_rsus(sheet: &[Row]) -> Result<Vec<Record>, SheetParseError> {
    detail_sheet_to_records(sheet)
}

/// Records of the ESPP purchases involved in a sale.
pub fn espp_sheet_to_espps(sheet: &[Row]) -> Result<Vec<Record>, SheetParseError> {
    detail_sheet_to_records(sheet)
}
