use std::fmt::Display;

use rust_decimal::Decimal;
use time::Date;

use crate::util::date::DateParseError;

/// Currency symbol, eg. "USD"
pub type Sym = String;
/// Units of the primary (local) currency per one unit of the symbol's
/// currency.
pub type Rate = Decimal;

#[derive(thiserror::Error, PartialEq, Eq, Clone, Debug)]
pub enum Error {
    #[error("No {symbol} rate available for {date}")]
    RateNotAvailable { symbol: Sym, date: Date },
    #[error("Symbol '{symbol}' not found in rates table (has: {available})")]
    SymbolNotFound { symbol: Sym, available: String },
    #[error(transparent)]
    BadDate(#[from] DateParseError),
    #[error("{symbol} rate for {date} is zero")]
    ZeroRate { symbol: Sym, date: Date },
    #[error("Could not read rates: {0}")]
    Read(String),
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct DailyRate {
    pub date: Date,
    pub rate: Rate,
}

impl DailyRate {
    pub fn new(date: Date, rate: Rate) -> DailyRate {
        DailyRate { date, rate }
    }
}

// Auto-implements to_string()
impl Display for DailyRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {}", self.date, self.rate)
    }
}

impl From<(Date, Rate)> for DailyRate {
    fn from((date, rate): (Date, Rate)) -> Self {
        DailyRate { date, rate }
    }
}

/// A rate series for a single foreign currency.
pub trait FxSingle {
    fn symbol(&self) -> &str;

    fn rate_at_date(&self, date: Date) -> Result<Rate, Error>;

    /// All (date, rate) pairs with start <= date <= end, in date order.
    fn iter_rates_over_date_range<'a>(&'a self, start: Date, end: Date)
        -> Box<dyn Iterator<Item = (Date, Rate)> + 'a>;

    /// Foreign amount to primary currency
    fn convert_to(&self, date: Date, amount: Decimal) -> Result<Decimal, Error> {
        Ok(amount * self.rate_at_date(date)?)
    }

    /// Primary currency amount to foreign
    fn convert_from(&self, date: Date, amount: Decimal) -> Result<Decimal, Error> {
        let rate = self.rate_at_date(date)?;
        amount.checked_div(rate).ok_or_else(|| Error::ZeroRate {
            symbol: self.symbol().to_string(),
            date,
        })
    }
}
