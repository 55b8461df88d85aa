use std::collections::BTreeMap;

use itertools::Itertools;
use time::Date;
use tracing::trace;

use super::{Error, FxSingle, Rate, Sym};

/// Rate series held in memory. Immutable once built.
#[derive(Debug, Clone)]
pub struct MemoryFxSingle {
    symbol: Sym,
    rates: BTreeMap<Date, Rate>,
}

impl MemoryFxSingle {
    /// Pairs may come in any order. Where a date appears more than once,
    /// the pairs are ordered by (date, rate) and the last one is kept.
    pub fn new<I>(symbol: &str, pairs: I) -> MemoryFxSingle
    where
        I: IntoIterator<Item = (Date, Rate)>,
    {
        let rates: BTreeMap<Date, Rate> = pairs.into_iter().sorted().collect();
        trace!(symbol, n_rates = rates.len(), "MemoryFxSingle::new");
        MemoryFxSingle { symbol: symbol.trim().to_uppercase(), rates }
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn first_date(&self) -> Option<Date> {
        self.rates.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<Date> {
        self.rates.keys().next_back().copied()
    }
}

impl FxSingle for MemoryFxSingle {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn rate_at_date(&self, date: Date) -> Result<Rate, Error> {
        self.rates.get(&date).copied().ok_or_else(|| Error::RateNotAvailable {
            symbol: self.symbol.clone(),
            date,
        })
    }

    fn iter_rates_over_date_range<'a>(&'a self, start: Date, end: Date)
        -> Box<dyn Iterator<Item = (Date, Rate)> + 'a> {
        if start > end {
            // BTreeMap::range panics on this.
            return Box::new(std::iter::empty());
        }
        Box::new(self.rates.range(start..=end).map(|(d, r)| (*d, *r)))
    }
}
