mod yahoo;

use std::collections::BTreeMap;

use log::{debug, warn};
use rayon::prelude::*;

use crate::core::GenericResult;
use crate::time::{Date, Period};
use crate::types::Decimal;

pub use self::yahoo::Yahoo;

/// Daily closing prices.
pub type HistoricalQuotes = BTreeMap<Date, Decimal>;

/// Closing prices per security.
pub type ClosingPrices = BTreeMap<String, HistoricalQuotes>;

pub trait HistoricalQuotesProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn get_historical_quotes(&self, symbol: &str, period: Period) -> GenericResult<Option<HistoricalQuotes>>;
}

/// Fetches closing prices of the specified securities. Securities without any data are omitted.
pub fn get_closing_prices(
    provider: &dyn HistoricalQuotesProvider, symbols: &[&str], period: Period,
) -> GenericResult<ClosingPrices> {
    debug!("Getting historical quotes from {} for the following symbols: {}...",
           provider.name(), symbols.join(", "));

    let quotes = symbols.par_iter().map(|&symbol| -> GenericResult<(&str, Option<HistoricalQuotes>)> {
        let quotes = provider.get_historical_quotes(symbol, period).map_err(|e| format!(
            "Failed to get {} quotes from {}: {}", symbol, provider.name(), e))?;
        Ok((symbol, quotes))
    }).collect::<GenericResult<Vec<_>>>()?;

    let mut prices = ClosingPrices::new();

    for (symbol, quotes) in quotes {
        match quotes {
            Some(quotes) if !quotes.is_empty() => {
                prices.insert(symbol.to_owned(), quotes);
            },
            _ => warn!("There are no {} quotes for {}.", symbol, period),
        }
    }

    Ok(prices)
}
