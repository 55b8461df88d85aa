//! Tabular views of the loaded records, for the output writers.

use std::collections::{BTreeMap, BTreeSet};

use time::Date;

use crate::fx::{DailyRate, Rate, Sym};
use crate::spc::{SaleRecord, Value};

#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct RenderTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub notes: Vec<String>,
    pub errors: Vec<String>,
}

fn opt_str<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

pub fn render_rate_series<I>(rates: I) -> RenderTable
where
    I: IntoIterator,
    I::Item: Into<DailyRate>,
{
    RenderTable {
        header: vec!["date".to_string(), "rate".to_string()],
        rows: rates
            .into_iter()
            .map(|r| {
                let r: DailyRate = r.into();
                vec![r.date.to_string(), r.rate.to_string()]
            })
            .collect(),
        ..Default::default()
    }
}

/// One row per date, with a column per symbol seen on any date.
pub fn render_all_rates<I>(rates: I) -> RenderTable
where
    I: IntoIterator<Item = (Date, BTreeMap<Sym, Rate>)>,
{
    let rates: Vec<_> = rates.into_iter().collect();
    let symbols: BTreeSet<&Sym> = rates.iter().flat_map(|(_, m)| m.keys()).collect();

    let mut header = vec!["date".to_string()];
    header.extend(symbols.iter().map(|s| s.to_string()));

    let rows = rates
        .iter()
        .map(|(date, m)| {
            let mut row = vec![date.to_string()];
            row.extend(symbols.iter().map(|s| opt_str(m.get(*s))));
            row
        })
        .collect();
    RenderTable { header, rows, ..Default::default() }
}

const SALE_COLUMNS: &[&str] = &[
    "order_number",
    "trade_date",
    "stock_symbol",
    "shares",
    "sale_price",
    "gross_proceeds",
    "net_proceeds_usd",
];

/// A summary row per sale. The detail lots are only counted.
pub fn render_sales(sales: &[SaleRecord]) -> RenderTable {
    let mut header = vec!["file".to_string(), "plan".to_string()];
    header.extend(SALE_COLUMNS.iter().map(|c| c.to_string()));
    header.push("lots".to_string());

    let rows = sales
        .iter()
        .map(|sale| {
            let mut row = vec![
                sale.from_file.clone().unwrap_or_default(),
                sale.plan_type.to_string(),
            ];
            row.extend(SALE_COLUMNS.iter().map(|c| opt_str(sale.field(c).map(Value::to_string))));
            row.push(sale.details.records().len().to_string());
            row
        })
        .collect();
    RenderTable { header, rows, ..Default::default() }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal_macros::dec;

    use crate::fx::DailyRate;
    use crate::spc::{PlanDetails, PlanType, Record, SaleRecord, Value};
    use crate::util::date::pub_testlib::ymd;

    use super::{render_all_rates, render_rate_series, render_sales};

    #[test]
    fn test_render_rate_series() {
        let t = render_rate_series(vec![(ymd(2008, 1, 7), dec!(2.50000))]);
        assert_eq!(t.header, vec!["date", "rate"]);
        assert_eq!(t.rows, vec![vec!["2008-01-07", "2.50000"]]);

        let t = render_rate_series(vec![
            DailyRate::new(ymd(2008, 1, 3), dec!(1.1)),
            DailyRate::new(ymd(2008, 1, 4), dec!(0)),
        ]);
        assert_eq!(t.rows, vec![vec!["2008-01-03", "1.1"], vec!["2008-01-04", "0"]]);

        let t = render_rate_series(Vec::<DailyRate>::new());
        assert!(t.rows.is_empty());
    }

    #[test]
    fn test_render_all_rates() {
        let t = render_all_rates(vec![
            (ymd(2008, 1, 1), BTreeMap::from([("BIV".to_string(), dec!(3.1))])),
            (ymd(2008, 1, 2), BTreeMap::from([("ABA".to_string(), dec!(2.2))])),
        ]);
        assert_eq!(t.header, vec!["date", "ABA", "BIV"]);
        assert_eq!(
            t.rows,
            vec![vec!["2008-01-01", "", "3.1"], vec!["2008-01-02", "2.2", ""]]
        );
    }

    #[test]
    fn test_render_sales() {
        let mut fields = Record::new();
        fields.insert("order_number".to_string(), Some(Value::Int(12)));
        fields.insert("sale_price".to_string(), None);
        let sale = SaleRecord {
            fields,
            plan_type: PlanType::Rsu,
            details: PlanDetails::Rsus(vec![Record::new(), Record::new()]),
            from_file: Some("Sale1.xlsx".to_string()),
        };
        let t = render_sales(&[sale]);
        assert_eq!(t.header.len(), 10);
        assert_eq!(
            t.rows,
            vec![vec!["Sale1.xlsx", "RSU", "12", "", "", "", "", "", "", "2"]]
        );
    }
}
