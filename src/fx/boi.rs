//! Rates workbooks of the central bank.
//!
//! The first sheet has a row of spoken currency names, then a row of
//! symbols, then a row per day. The day's label and date are in the first
//! two columns, and rates for each symbol are in the columns after.

use std::collections::BTreeMap;
use std::path::Path;

use itertools::Itertools;
use time::Date;
use tracing::{debug, trace, warn};

use crate::sheet::{cell_is_blank, Cell, Row};
use crate::util::date::{parse_boi_date, DateParseError, BOI_DATE_FORMAT};
use crate::util::decimal::{parse_decimal, round_fixed};

use super::{Error, MemoryFxSingle, Rate, Sym};

pub const RATE_ROUND_DIGITS: u32 = 5;

const DATE_COL: usize = 1;
const FIRST_RATE_COL: usize = 2;

/// Rates are rounded to a fixed number of digits. Anything which isn't a
/// number is no rate.
pub fn convert_rate(c: &Option<Cell>) -> Option<Rate> {
    let d = match c.as_ref()? {
        Cell::Decimal(d) => *d,
        Cell::Int(i) => Rate::from(*i),
        Cell::Text(s) => parse_decimal(s).ok()?,
        Cell::Date(_) => return None,
    };
    Some(round_fixed(d, RATE_ROUND_DIGITS))
}

fn cell_to_date(c: &Option<Cell>) -> Result<Date, DateParseError> {
    match c {
        Some(Cell::Date(d)) => Ok(*d),
        Some(Cell::Text(s)) => parse_boi_date(s),
        other => Err(DateParseError {
            value: other.as_ref().map(|c| c.to_string()).unwrap_or_default(),
            format: BOI_DATE_FORMAT,
            reason: "not a date or text cell".to_string(),
        }),
    }
}

fn cell_at(row: &Row, i: usize) -> Option<Cell> {
    row.get(i).cloned().flatten()
}

fn header_symbols(header: &Row) -> Vec<Option<Sym>> {
    header
        .iter()
        .skip(FIRST_RATE_COL)
        .map(|c| match c {
            Some(c) if !c.is_blank() => Some(c.to_string().trim().to_uppercase()),
            _ => None,
        })
        .collect()
}

/// The rows of the first sheet of a rates workbook, without the spoken
/// names row.
pub fn iter_excel(path: &Path) -> Result<impl Iterator<Item = Row>, Error> {
    let table = crate::peripheral::read_first_sheet(path).map_err(Error::Read)?;
    Ok(table.into_iter().skip(1))
}

/// Rates for every symbol, by date.
///
/// The first row must be the symbols row. Reading stops at the first blank
/// row. Rows without a valid date are skipped, as are dates with no usable
/// rates at all.
pub fn parse_all<I>(rows: I) -> impl Iterator<Item = (Date, BTreeMap<Sym, Rate>)>
where
    I: IntoIterator<Item = Row>,
{
    let mut rows = rows.into_iter();
    let symbols = rows.next().map(|h| header_symbols(&h)).unwrap_or_default();
    trace!(n_symbols = symbols.len(), "parse_all");

    rows.take_while(|row| !row.iter().all(cell_is_blank))
        .filter_map(move |row| {
            let date = match cell_to_date(&cell_at(&row, DATE_COL)) {
                Ok(d) => d,
                Err(e) => {
                    debug!("parse_all: skipping row: {}", e);
                    return None;
                }
            };
            let rates: BTreeMap<Sym, Rate> = symbols
                .iter()
                .zip(row.iter().skip(FIRST_RATE_COL))
                .filter_map(|(sym, c)| match (sym, convert_rate(c)) {
                    (Some(sym), Some(rate)) if !rate.is_zero() => Some((sym.clone(), rate)),
                    _ => None,
                })
                .collect();
            if rates.is_empty() {
                None
            } else {
                Some((date, rates))
            }
        })
}

/// (date, rate) pairs of a single symbol, in sheet order.
///
/// Reading stops at the first row where both the date and rate are blank.
/// Rows where only one of them is blank are skipped. A date which can't be
/// parsed is an error. Rates which aren't numbers are included as None.
pub fn parse_single<I>(symbol: &str, rows: I)
-> Result<impl Iterator<Item = Result<(Date, Option<Rate>), Error>>, Error>
where
    I: IntoIterator<Item = Row>,
{
    let mut rows = rows.into_iter();
    let symbols: Vec<Option<Sym>> = rows.next().map(|h| header_symbols(&h)).unwrap_or_default();
    let wanted = symbol.trim().to_uppercase();
    let col = symbols
        .iter()
        .position(|s| s.as_ref().map(|s| s.to_uppercase() == wanted).unwrap_or(false))
        .map(|i| i + FIRST_RATE_COL)
        .ok_or_else(|| Error::SymbolNotFound {
            symbol: symbol.to_string(),
            available: symbols.iter().flatten().join(", "),
        })?;
    trace!(symbol, col, "parse_single");

    Ok(rows
        .map(move |row| (cell_at(&row, DATE_COL), cell_at(&row, col)))
        .take_while(|(date, rate)| !(cell_is_blank(date) && cell_is_blank(rate)))
        .filter(|(date, rate)| !cell_is_blank(date) && !cell_is_blank(rate))
        .map(|(date, rate)| -> Result<(Date, Option<Rate>), Error> {
            Ok((cell_to_date(&date)?, convert_rate(&rate)))
        }))
}

/// Loads one symbol's rates from a rates workbook (or a tab separated export
/// of one). Dates without a usable rate are left out.
pub fn load_single(path: &Path, symbol: &str) -> Result<MemoryFxSingle, Error> {
    let mut pairs = Vec::new();
    for res in parse_single(symbol, iter_excel(path)?)? {
        match res? {
            (date, Some(rate)) => pairs.push((date, rate)),
            (date, None) => warn!("No usable {} rate for {}", symbol, date),
        }
    }
    Ok(MemoryFxSingle::new(symbol, pairs))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal_macros::dec;

    use crate::fx::Error;
    use crate::row;
    use crate::sheet::{Cell, Row, Table};
    use crate::util::date::pub_testlib::ymd;

    use super::{convert_rate, parse_all, parse_single};

    fn rows() -> Table {
        vec![
            row!["", "", "ABA", "BIV"],
            row!["", "01 Jan 08", "2.1", "3.1"],
            row!["", "Avg", "2.0", "3.0"],
            vec![None, Some(Cell::Date(ymd(2008, 1, 2))), Some(Cell::Decimal(dec!(2.2))), None],
            row!["", "03 Jan 08", "n/a", "0"],
            row!["", "04 Jan 08", "", "3.123456"],
            row!["", "", "", ""],
            row!["Footer", "05 Jan 08", "9", "9"],
        ]
    }

    #[test]
    fn test_convert_rate() {
        assert_eq!(convert_rate(&Some(Cell::text("1.234567"))), Some(dec!(1.23457)));
        assert_eq!(convert_rate(&Some(Cell::Int(3))), Some(dec!(3)));
        assert_eq!(convert_rate(&Some(Cell::text("n/a"))), None);
        assert_eq!(convert_rate(&Some(Cell::text(""))), None);
        assert_eq!(convert_rate(&None), None);
        assert_eq!(convert_rate(&Some(Cell::Decimal(dec!(2.1)))).unwrap().to_string(), "2.10000");
    }

    #[test]
    fn test_parse_all() {
        let all: Vec<_> = parse_all(rows()).collect();
        let expected = vec![
            (ymd(2008, 1, 1), BTreeMap::from([
                ("ABA".to_string(), dec!(2.1)),
                ("BIV".to_string(), dec!(3.1)),
            ])),
            (ymd(2008, 1, 2), BTreeMap::from([("ABA".to_string(), dec!(2.2))])),
            (ymd(2008, 1, 4), BTreeMap::from([("BIV".to_string(), dec!(3.12346))])),
        ];
        assert_eq!(all, expected);

        let empty: Vec<Row> = vec![];
        assert_eq!(parse_all(empty).count(), 0);

        // Header symbols are normalized the same way parse_single does
        let mixed_case = vec![row!["", "", "aba ", " Biv"], row!["", "01 Jan 08", "2.1", "3.1"]];
        let all: Vec<_> = parse_all(mixed_case).collect();
        assert_eq!(
            all,
            vec![(ymd(2008, 1, 1), BTreeMap::from([
                ("ABA".to_string(), dec!(2.1)),
                ("BIV".to_string(), dec!(3.1)),
            ]))]
        );
    }

    #[test]
    fn test_parse_single() {
        let aba: Vec<_> = parse_single(" aba", rows()).unwrap().collect();
        assert_eq!(
            aba,
            vec![
                Ok((ymd(2008, 1, 1), Some(dec!(2.1)))),
                Err(Error::BadDate(crate::util::date::parse_boi_date("Avg").unwrap_err())),
                Ok((ymd(2008, 1, 2), Some(dec!(2.2)))),
                Ok((ymd(2008, 1, 3), None)),
            ]
        );

        // BIV is absent on 01-02, so that row is skipped. Zero is still a
        // rate here, unlike in parse_all.
        let biv: Vec<_> = parse_single("BIV", rows()).unwrap().collect();
        assert_eq!(
            biv,
            vec![
                Ok((ymd(2008, 1, 1), Some(dec!(3.1)))),
                Err(Error::BadDate(crate::util::date::parse_boi_date("Avg").unwrap_err())),
                Ok((ymd(2008, 1, 3), Some(dec!(0)))),
                Ok((ymd(2008, 1, 4), Some(dec!(3.12346)))),
            ]
        );
    }

    #[test]
    fn test_parse_single_symbol_not_found() {
        let err = parse_single("CRB", rows()).err().unwrap();
        assert_eq!(
            err,
            Error::SymbolNotFound { symbol: "CRB".to_string(), available: "ABA, BIV".to_string() }
        );
    }
}
