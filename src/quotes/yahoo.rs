use std::time::Duration;

use chrono::{DateTime, NaiveTime};
use log::trace;
use reqwest::{StatusCode, Url};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::QuotesConfig;
use crate::core::GenericResult;
use crate::http;
use crate::time::{Date, Period};
use crate::types::Decimal;
use crate::util;

use super::{HistoricalQuotes, HistoricalQuotesProvider};

/// Yahoo Finance chart API. B3 securities are listed there with `.SA` suffix.
pub struct Yahoo {
    url: String,
    symbol_suffix: String,
    max_retry_time: Duration,
    client: Client,
}

impl Yahoo {
    pub fn new(config: &QuotesConfig) -> GenericResult<Yahoo> {
        Ok(Yahoo {
            url: config.url.clone(),
            symbol_suffix: config.symbol_suffix.clone(),
            max_retry_time: config.max_retry_time,
            client: http::new_client(config.timeout)?,
        })
    }
}

impl HistoricalQuotesProvider for Yahoo {
    fn name(&self) -> &'static str {
        "Yahoo Finance"
    }

    fn get_historical_quotes(&self, symbol: &str, period: Period) -> GenericResult<Option<HistoricalQuotes>> {
        let start = period.first_date().and_time(NaiveTime::MIN).and_utc().timestamp();
        let end = period.last_date().succ_opt().ok_or("Invalid period")?
            .and_time(NaiveTime::MIN).and_utc().timestamp();

        let url = Url::parse_with_params(&format!("{}/v8/finance/chart/{}{}", self.url, symbol, self.symbol_suffix), &[
            ("period1", start.to_string().as_str()),
            ("period2", end.to_string().as_str()),
            ("interval", "1d"),
        ])?;

        let get = |url: &Url| -> GenericResult<Option<HistoricalQuotes>> {
            let response = http::send_request(&self.client, url, self.max_retry_time)?;

            let status = response.status();
            if !status.is_success() && status != StatusCode::NOT_FOUND {
                return Err!("Server returned an error: {}", status);
            }

            parse_historical_quotes(symbol, period, &response.text()?)
        };

        Ok(get(&url).map_err(|e| format!("Failed to get historical quotes from {url}: {e}"))?)
    }
}

#[derive(Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    code: String,
    description: Option<String>,
}

#[derive(Deserialize)]
struct ChartResult {
    meta: Meta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Deserialize)]
struct Meta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<Decimal>>,
}

fn parse_historical_quotes(symbol: &str, period: Period, response: &str) -> GenericResult<Option<HistoricalQuotes>> {
    let response: ChartResponse = serde_json::from_str(response).map_err(|e| format!(
        "Got an unexpected response: {e}"))?;

    if let Some(error) = response.chart.error {
        if error.code == "Not Found" {
            return Ok(None);
        }
        return Err!("{}: {}", error.code, error.description.unwrap_or_default());
    }

    let Some(result) = response.chart.result.and_then(|mut results| results.pop()) else {
        return Ok(None);
    };

    let closes = match result.indicators.quote.into_iter().next() {
        Some(quote) => quote.close,
        None => return Ok(None),
    };

    if closes.len() != result.timestamp.len() {
        return Err!("Got an unexpected response: quotes don't match timestamps");
    }

    let mut quotes = HistoricalQuotes::new();

    for (&timestamp, close) in result.timestamp.iter().zip(closes) {
        // Trading day start in exchange local time
        let date: Date = DateTime::from_timestamp(timestamp + result.meta.gmtoffset, 0)
            .ok_or_else(|| format!("Got an invalid timestamp: {timestamp}"))?
            .date_naive();

        let Some(close) = close else {
            trace!("{symbol}: There is no close price for {date}.");
            continue;
        };

        if !period.contains(date) {
            continue;
        }

        let price = util::validate_positive_decimal(close)
            .map_err(|_| format!("Got an invalid {symbol} price: {close}"))?;

        // Closes are floats, so drop the binary representation noise
        quotes.insert(date, util::round_to(price, 4));
    }

    Ok(Some(quotes))
}
