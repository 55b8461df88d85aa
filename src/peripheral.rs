use std::path::Path;

use crate::sheet::Table;

pub mod delimited;

#[cfg(feature = "xlsx_read")]
pub mod excel;

#[cfg(feature = "cliapp")]
pub mod boi_rates_impl;
#[cfg(all(feature = "cliapp", feature = "xlsx_read"))]
pub mod spc_books_impl;

pub type Error = String;

fn extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Reads the first sheet of a spreadsheet file, picking the decoder by file
/// extension. Tab and comma separated text files have only the one sheet.
pub fn read_first_sheet(path: &Path) -> Result<Table, Error> {
    match extension(path).as_str() {
        "tsv" | "txt" => delimited::read_delimited_file(path, b'\t'),
        "csv" => delimited::read_delimited_file(path, b','),
        #[cfg(feature = "xlsx_read")]
        _ => {
            let book = excel::read_workbook(path)?;
            book.sheets
                .into_iter()
                .next()
                .ok_or_else(|| format!("{} has no sheets", path.display()))
        }
        #[cfg(not(feature = "xlsx_read"))]
        ext => Err(format!(
            "Cannot read {}: no reader for .{} files", path.display(), ext)),
    }
}
