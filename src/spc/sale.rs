use std::borrow::Borrow;
use std::collections::HashSet;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::sheet::{
    cell_eq_str, cell_is_truthy, rows_same_width, split_table_at_heading,
    to_single_table, without_empty_columns, Cell, Row, Table, TableError,
};

use super::{xlate_kv, Record, SheetParseError};

/// Marks the first row of the sale table
pub const ORDER_DETAILS_MARKER: &str = "Order Details";
/// Heading of the right-hand table, which sits beside the order details
pub const PROCEEDS_DETAILS_HEADING: &str = "Proceeds Details";

/// Get the rows of the sale table, from the "Order Details" marker row
/// up to (not including) the next completely empty row.
pub fn sale_sheet_relevant_rows<I>(sheet: I) -> Table
where
    I: IntoIterator,
    I::Item: Borrow<Row>,
{
    let mut rows = Table::new();
    for (i, row) in sheet.into_iter().enumerate() {
        let row: &Row = Borrow::<Row>::borrow(&row);
        if rows.is_empty() && !row.iter().any(|c| cell_eq_str(c, ORDER_DETAILS_MARKER)) {
            continue;
        }
        if !row.iter().any(cell_is_truthy) {
            debug!("sale_sheet_relevant_rows: table ends at row {}", i + 1);
            break;
        }
        rows.push(row.clone());
    }
    rows
}

fn key_str(c: &Option<Cell>) -> String {
    c.as_ref().map(|c| c.to_string()).unwrap_or_default()
}

/// By this point every row is a single key/value pair. Translate them into
/// a record.
///
/// Fails if any key appears more than once, rather than letting one
/// overwrite the other.
pub fn sales_table_to_dict(table: &[Row]) -> Result<Record, SheetParseError> {
    for (i, row) in table.iter().enumerate() {
        if row.len() != 2 {
            return Err(TableError::NotKeyValue { row: i + 1, width: row.len() }.into());
        }
    }

    let mut seen = HashSet::new();
    let dups: Vec<String> = table
        .iter()
        .map(|r| key_str(&r[0]))
        .filter(|k| !seen.insert(k.clone()))
        .unique()
        .collect();
    if !dups.is_empty() {
        return Err(SheetParseError::DuplicateHeading(dups));
    }

    let mut record = Record::new();
    for row in table {
        let (k, v) = xlate_kv(&key_str(&row[0]), row[1].as_ref())?;
        record.insert(k.to_string(), v);
    }
    Ok(record)
}

/// Converts a whole sale summary sheet to a record.
pub fn sale_sheet_to_dict(sheet: &[Row]) -> Result<Record, SheetParseError> {
    trace!("sale_sheet_to_dict: {} rows", sheet.len());
    let rows = sale_sheet_relevant_rows(sheet);
    if rows.is_empty() {
        return Err(SheetParseError::NoContent("Order Details table"));
    }
    let rows = rows_same_width(&rows, Some(Cell::Text(String::new())));
    let rows = without_empty_columns(&rows);
    let table = to_single_table(split_table_at_heading(&rows, PROCEEDS_DETAILS_HEADING, true)?);
    sales_table_to_dict(&table)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use crate::row;
    use crate::sheet::{Cell, Table, TableError};
    use crate::spc::{PlanType, SheetParseError, Value, XlateError};
    use crate::util::date::pub_testlib::ymd;

    use super::{sale_sheet_relevant_rows, sale_sheet_to_dict, sales_table_to_dict};

    #[test]
    fn test_sale_sheet_relevant_rows() {
        let table = vec![
            row!["a", "b", "c"],
            row!["c", "d", "Order Details"],
            row!["e", "f", "g"],
            row!["h", "i", "j"],
            row!["", "", ""],
            row!["k", "l", "m"],
        ];
        let rows = sale_sheet_relevant_rows(&table);
        assert_eq!(rows, table[1..4].to_vec());

        // Absent cells count as empty too
        let table = vec![
            row!["Order Details"],
            row!["x"],
            vec![None, None],
            row!["y"],
        ];
        assert_eq!(sale_sheet_relevant_rows(table).len(), 2);

        let no_marker = vec![row!["a"], row!["b"]];
        assert_eq!(sale_sheet_relevant_rows(no_marker), Table::new());
    }

    #[test]
    fn test_sales_table_to_dict() {
        // Ensure duplicate keys barf
        let table = vec![row!["hello", 2i64], row!["hello", 3i64]];
        assert_eq!(
            sales_table_to_dict(&table),
            Err(SheetParseError::DuplicateHeading(vec!["hello".to_string()]))
        );

        let table = vec![row!["Order Number", 2i64, "extra"]];
        assert_eq!(
            sales_table_to_dict(&table),
            Err(SheetParseError::Table(TableError::NotKeyValue { row: 1, width: 3 }))
        );

        let table = vec![row!["Order Number", 2i64], row!["Stock Symbol", "ABC"]];
        let rec = sales_table_to_dict(&table).unwrap();
        assert_eq!(rec["order_number"], Some(Value::Int(2)));
        assert_eq!(rec["stock_symbol"], Some(Value::Text("ABC".to_string())));

        let table = vec![row!["Shoe Size", 2i64]];
        assert_eq!(
            sales_table_to_dict(&table),
            Err(SheetParseError::Xlate(XlateError::UnknownField("Shoe Size".to_string())))
        );
    }

    fn sale_sheet() -> Table {
        vec![
            row!["", "", "", "", "", ""],
            row!["Stock Plan Sale Confirmation", "", "", "", "", ""],
            row!["Name:", "DAVE WAVES", "", "", "", ""],
            row!["", "", "", "", "", ""],
            row!["Order Details", "", "", "Proceeds Details", "", ""],
            vec![
                Some(Cell::text("Order Number")), None, Some(Cell::Int(1234)),
                Some(Cell::text("Gross Proceeds")), None, Some(Cell::Decimal(dec!(5000.25))),
            ],
            row!["Plan Name", "", "RESTRICTED STOCK AWARDS/UNITS",
                 "Commissions", "", "0"],
            row!["Trade Date", "", "10/16/2019",
                 "Final Currency Conversion Rate", "", "1 USD = 0.9 EUR"],
            row!["Shares Sold", "", "62", "Net Proceeds ({reqCurr})", "", "oops"],
            row!["Stock Symbol", "", "ABC", "", "", ""],
            row!["", "", "", "", "", ""],
            row!["This is not an official statement.", "", "", "", "", ""],
        ]
    }

    #[test]
    fn test_sale_sheet_to_dict() {
        let rec = sale_sheet_to_dict(&sale_sheet()).unwrap();
        assert_eq!(rec.len(), 9);
        assert_eq!(rec["order_number"], Some(Value::Int(1234)));
        assert_eq!(rec["plan_type"], Some(Value::PlanType(PlanType::Rsu)));
        assert_eq!(rec["trade_date"], Some(Value::Date(ymd(2019, 10, 16))));
        assert_eq!(rec["shares"], Some(Value::Int(62)));
        assert_eq!(rec["stock_symbol"], Some(Value::Text("ABC".to_string())));
        assert_eq!(rec["gross_proceeds"], Some(Value::Decimal(dec!(5000.25))));
        assert_eq!(rec["commissions"], Some(Value::Decimal(dec!(0))));
        assert_eq!(rec["conversion_rate"], Some(Value::Decimal(dec!(0.9))));
        // Recovered locally
        assert_eq!(rec["net_proceeds_reqcurr"], None);
    }

    #[test]
    fn test_sale_sheet_to_dict_errors() {
        let no_table = vec![row!["Nothing to see here"]];
        assert_eq!(
            sale_sheet_to_dict(&no_table),
            Err(SheetParseError::NoContent("Order Details table"))
        );

        let no_proceeds = vec![
            row!["Order Details", ""],
            row!["Order Number", "1"],
        ];
        assert_eq!(
            sale_sheet_to_dict(&no_proceeds),
            Err(SheetParseError::Table(TableError::HeadingNotFound(
                "Proceeds Details".to_string()
            )))
        );

        let mut bad_date = sale_sheet();
        bad_date[7][2] = Some(Cell::text("yesterday"));
        assert!(matches!(
            sale_sheet_to_dict(&bad_date),
            Err(SheetParseError::Xlate(XlateError::BadDate(_)))
        ));
    }
}
