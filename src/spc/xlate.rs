use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::Serialize;
use time::Date;
use tracing::warn;

use crate::sheet::Cell;
use crate::util::date::{
    parse_iso_date, parse_us_date, DateParseError, ISO_DATE_FORMAT,
    US_DATE_FORMAT,
};
use crate::util::decimal::parse_decimal;

#[derive(thiserror::Error, PartialEq, Eq, Clone, Debug)]
pub enum XlateError {
    #[error("Field '{0}' not recognized")]
    UnknownField(String),
    #[error("{0}")]
    BadDate(#[from] DateParseError),
    #[error("Could not convert '{0}' to an integer")]
    BadInt(String),
    #[error("No value for {0} field")]
    MissingValue(&'static str),
    #[error("Could not determine plan type for '{0}'")]
    UnknownPlanType(String),
}

#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, PartialOrd, Ord, Serialize)]
pub enum PlanType {
    #[serde(rename = "RSU")]
    Rsu,
    #[serde(rename = "ESPP")]
    Espp,
}

// Checked in order; the first variant with a matching phrase wins.
const PLAN_TYPE_PHRASES: &[(PlanType, &[&str])] = &[
    (PlanType::Rsu, &["restricted stock unit", "restricted stock award", "rsu"]),
    (PlanType::Espp, &["espp"]),
];

impl PlanType {
    /// Infers the plan type from a free-text plan name,
    /// eg. "RESTRICTED STOCK AWARDS/UNITS".
    pub fn from_s(src: &str) -> Result<PlanType, XlateError> {
        let norm = src.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        for (plan_type, phrases) in PLAN_TYPE_PHRASES {
            if phrases.iter().any(|p| norm.contains(p)) {
                return Ok(*plan_type);
            }
        }
        Err(XlateError::UnknownPlanType(src.to_string()))
    }
}

impl Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanType::Rsu => write!(f, "RSU"),
            PlanType::Espp => write!(f, "ESPP"),
        }
    }
}

/// A translated (typed) field value.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Value {
    Text(String),
    Int(i64),
    Decimal(Decimal),
    Date(Date),
    PlanType(PlanType),
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Date(d) => write!(f, "{}", d),
            Value::PlanType(p) => write!(f, "{}", p),
        }
    }
}

// Decimals and dates are written as strings, so no precision is lost.
impl Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Int(i) => s.serialize_i64(*i),
            v => s.serialize_str(&v.to_string()),
        }
    }
}

/// Canonical field name to value. `None` is an explicit "no value".
pub type Record = BTreeMap<String, Option<Value>>;

pub type Converter = fn(Option<&Cell>) -> Result<Option<Value>, XlateError>;

#[derive(Clone, Copy)]
pub struct TranslationRule {
    pub name: &'static str,
    pub convert: Converter,
}

impl std::fmt::Debug for TranslationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TranslationRule({})", self.name)
    }
}

//
// CONVERTERS
//

fn date_with(
    v: Option<&Cell>,
    format: &'static str,
    parse: fn(&str) -> Result<Date, DateParseError>,
) -> Result<Option<Value>, XlateError> {
    match v {
        Some(Cell::Date(d)) => Ok(Some(Value::Date(*d))),
        Some(Cell::Text(s)) => Ok(Some(Value::Date(parse(s)?))),
        Some(other) => Err(XlateError::BadDate(DateParseError {
            value: other.to_string(),
            format,
            reason: "not a date or text cell".to_string(),
        })),
        None => Err(XlateError::MissingValue("date")),
    }
}

/// MM/DD/YYYY
pub fn str_us_to_date(v: Option<&Cell>) -> Result<Option<Value>, XlateError> {
    date_with(v, US_DATE_FORMAT, parse_us_date)
}

/// YYYY-MM-DD
pub fn str_iso_to_date(v: Option<&Cell>) -> Result<Option<Value>, XlateError> {
    date_with(v, ISO_DATE_FORMAT, parse_iso_date)
}

/// Best-effort conversion of the sheets' amounts to Decimal.
/// Malformed values are logged and produce no value, rather than an error.
pub fn currency(v: Option<&Cell>) -> Result<Option<Value>, XlateError> {
    let d = match v {
        None => return Ok(None),
        Some(Cell::Decimal(d)) => Some(*d),
        Some(Cell::Int(i)) => Some(Decimal::from(*i)),
        Some(Cell::Text(s)) => parse_decimal(s).ok(),
        Some(Cell::Date(_)) => None,
    };
    if d.is_none() {
        // This is usually where the source sheet cell isn't in expected form
        warn!("Couldn't convert '{}' to currency", v.map(|c| c.to_string()).unwrap_or_default());
    }
    Ok(d.map(Value::Decimal))
}

lazy_static! {
    static ref CURR_CONV_DESC_RE: Regex = Regex::new(concat!(
        r"^\s*(?P<src_amt>[0-9]+(?:\.[0-9]+)?)", // source amount
        r"\s*(?P<src_sym>[A-Z]{3})\s*=",        // source symbol (eg. USD)
        r"\s*(?P<dst_amt>[0-9]+(?:\.[0-9]+)?)", // dest amount
        r"\s*(?P<dst_sym>[A-Z]{3})\s*$",        // dest symbol (eg. EUR)
    )).unwrap();
}

/// Extracts the destination amount from a conversion description like
/// "1 USD = 0.87 EUR". Anything else is no value.
pub fn cc_rate(v: Option<&Cell>) -> Result<Option<Value>, XlateError> {
    let s = match v {
        Some(Cell::Text(s)) => s,
        _ => return Ok(None),
    };
    Ok(CURR_CONV_DESC_RE
        .captures(s)
        .and_then(|m| m.name("dst_amt"))
        .and_then(|dst| parse_decimal(dst.as_str()).ok())
        .map(Value::Decimal))
}

pub fn int(v: Option<&Cell>) -> Result<Option<Value>, XlateError> {
    let bad = |c: &Cell| XlateError::BadInt(c.to_string());
    match v {
        Some(Cell::Int(i)) => Ok(Some(Value::Int(*i))),
        Some(c @ Cell::Decimal(d)) => {
            if !d.fract().is_zero() {
                return Err(bad(c));
            }
            d.to_i64().map(|i| Some(Value::Int(i))).ok_or_else(|| bad(c))
        }
        Some(c @ Cell::Text(s)) => {
            s.trim().parse::<i64>().map(|i| Some(Value::Int(i))).map_err(|_| bad(c))
        }
        Some(c @ Cell::Date(_)) => Err(bad(c)),
        None => Err(XlateError::MissingValue("integer")),
    }
}

pub fn text(v: Option<&Cell>) -> Result<Option<Value>, XlateError> {
    Ok(v.map(|c| Value::Text(c.to_string())))
}

pub fn plan_type(v: Option<&Cell>) -> Result<Option<Value>, XlateError> {
    let src = v.map(|c| c.to_string()).unwrap_or_default();
    PlanType::from_s(&src).map(|p| Some(Value::PlanType(p)))
}

/// Normalize a heading, eg. "Net Proceeds ({reqCurr})" -> "net_proceeds_reqcurr"
pub fn norm_key(k: &str) -> String {
    lazy_static! {
        static ref WS_RE: Regex = Regex::new(r"\s+").unwrap();
        static ref UNDERSCORES_RE: Regex = Regex::new(r"_+").unwrap();
    }
    let norm: String = k
        .to_lowercase()
        .trim()
        .chars()
        .filter_map(|c| match c {
            '/' => Some('_'),
            '(' | ')' | '{' | '}' => None,
            c => Some(c),
        })
        .collect();
    let norm = WS_RE.replace_all(&norm, "_");
    let norm = UNDERSCORES_RE.replace_all(&norm, "_");
    norm.trim_matches('_').to_string()
}

// Normalized original heading, canonical name, converter.
// Some canonical names have multiple spellings across sheet revisions.
const XLATOR_TABLE: &[(&str, &str, Converter)] = &[
    ("acquired_date", "acquired_date", str_us_to_date),
    ("acquisition_date", "acquired_date", str_us_to_date),
    ("acquisition_fair_market_value_fmv", "acquired_fmv", currency),
    ("acquired_price", "acquired_price", currency),
    ("backup_withholding", "backup_withholding", currency),
    ("commissions", "commissions", currency),
    ("final_currency_conversion_rate", "conversion_rate", cc_rate),
    ("gross_proceeds", "gross_proceeds", currency),
    ("net_proceeds", "net_proceeds_usd", currency),
    ("net_proceeds_reqcurr", "net_proceeds_reqcurr", currency),
    ("order_number", "order_number", int),
    ("order_source", "order_source", text),
    ("order_status", "status", text),
    ("order_type", "order_type", text),
    ("plan_name", "plan_type", plan_type),
    ("proceeds_delivery_fee", "delivery_fee", currency),
    ("proceeds_delivery_method", "delivery_method", text),
    ("proceeds_delivery_methods", "delivery_method", text),
    ("proceeds_type", "proceeds_type", text),
    ("processing_fee", "processing_fee", currency),
    ("realized_capital_gain_loss", "gain", currency),
    ("requested_currency", "requested_currency", text),
    ("sale_price", "sale_price", currency),
    ("settlement_date", "settlement_date", str_us_to_date),
    ("shares", "shares", int),
    ("shares_sold", "shares", int),
    ("status", "status", text),
    ("stock_symbol", "stock_symbol", text),
    ("supplemental_transaction_fee", "supplemental_fee", currency),
    ("total_fees", "total_fees", currency),
    ("trade_date", "trade_date", str_us_to_date),
    ("transaction_date", "trade_date", str_us_to_date),
    ("transaction_type", "transaction_type", text),
];

lazy_static! {
    pub static ref XLATORS: HashMap<&'static str, TranslationRule> = XLATOR_TABLE
        .iter()
        .map(|(k, name, convert)| (*k, TranslationRule { name: *name, convert: *convert }))
        .collect();
}

/// Translate a heading and its value to the canonical field name and
/// typed value.
pub fn xlate_kv(k: &str, v: Option<&Cell>)
-> Result<(&'static str, Option<Value>), XlateError> {
    let norm = norm_key(k);
    let rule = XLATORS
        .get(norm.as_str())
        .ok_or_else(|| XlateError::UnknownField(k.to_string()))?;
    Ok((rule.name, (rule.convert)(v)?))
}
