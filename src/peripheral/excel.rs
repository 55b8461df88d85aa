use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::debug;

use crate::sheet::{Cell, Row, Table, Workbook};
use crate::util::date::excel_serial_to_date;
use crate::util::decimal::decimal_from_f64;

use super::Error;

pub fn data_to_cell(d: &Data) -> Option<Cell> {
    Some(match d {
        Data::Empty => return None,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => match decimal_from_f64(*f) {
            Some(d) => Cell::Decimal(d),
            None => Cell::Text(f.to_string()),
        },
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            match excel_serial_to_date(serial) {
                Some(date) => Cell::Date(date),
                None => Cell::Text(serial.to_string()),
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("{e:?}")),
    })
}

/// The range only covers the used cells, so pad it back out to start at A1,
/// so column positions match what is seen in the sheet.
fn range_to_table(range: &Range<Data>) -> Table {
    let (row0, col0) = match range.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return Table::new(),
    };
    let mut table: Table = vec![Row::new(); row0];
    for r in range.rows() {
        let mut row: Row = vec![None; col0];
        row.extend(r.iter().map(data_to_cell));
        table.push(row);
    }
    table
}

/// Reads every sheet of an xls, xlsx, xlsb or ods file.
pub fn read_workbook(path: &Path) -> Result<Workbook, Error> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    let n_sheets = workbook.sheet_names().len();
    debug!("read_workbook: {} has {} sheets", path.display(), n_sheets);

    let mut sheets = Vec::with_capacity(n_sheets);
    for i in 0..n_sheets {
        let range = workbook
            .worksheet_range_at(i)
            .ok_or_else(|| format!("No sheet {i} in {}", path.display()))?
            .map_err(|e| format!("Failed to read sheet {i} of {}: {e}", path.display()))?;
        sheets.push(range_to_table(&range));
    }
    Ok(Workbook::new(sheets))
}

#[cfg(test)]
mod tests {
    use calamine::{Data, Range};
    use rust_decimal_macros::dec;

    use crate::sheet::Cell;

    use super::{data_to_cell, range_to_table};

    #[test]
    fn test_data_to_cell() {
        assert_eq!(data_to_cell(&Data::Empty), None);
        assert_eq!(data_to_cell(&Data::String("x".to_string())), Some(Cell::text("x")));
        assert_eq!(data_to_cell(&Data::Int(3)), Some(Cell::Int(3)));
        assert_eq!(data_to_cell(&Data::Float(107.3465)), Some(Cell::Decimal(dec!(107.3465))));
        assert_eq!(data_to_cell(&Data::Float(1e40)), Some(Cell::text("10000000000000000000000000000000000000000")));
        assert_eq!(data_to_cell(&Data::Bool(true)), Some(Cell::text("true")));
    }

    #[test]
    fn test_range_to_table() {
        let mut range: Range<Data> = Range::new((1, 2), (2, 3));
        range.set_value((1, 2), Data::String("a".to_string()));
        range.set_value((2, 3), Data::Float(2.5));
        let table = range_to_table(&range);
        assert_eq!(
            table,
            vec![
                vec![],
                vec![None, None, Some(Cell::text("a")), None],
                vec![None, None, None, Some(Cell::Decimal(dec!(2.5)))],
            ]
        );

        assert!(range_to_table(&Range::<Data>::empty()).is_empty());
    }
}
