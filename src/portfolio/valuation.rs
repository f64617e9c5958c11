use std::collections::BTreeMap;

use crate::positions::PositionHistory;
use crate::quotes::{ClosingPrices, HistoricalQuotes};
use crate::time::{Date, Period};
use crate::types::Decimal;

/// Securities which have an open position at some moment of the period.
pub fn get_held_symbols(history: &PositionHistory, period: Period) -> Vec<&str> {
    history.iter().filter(|&(symbol, snapshots)| {
        let held_at_start = history.get_as_of(symbol, period.first_date())
            .is_some_and(|snapshot| !snapshot.quantity.is_zero());

        held_at_start || snapshots.iter().any(|snapshot| {
            period.contains(snapshot.date) && !snapshot.quantity.is_zero()
        })
    }).map(|(symbol, _)| symbol).collect()
}

/// Calculates daily portfolio value for each trading day of the period (the days for which there
/// is at least one closing price).
///
/// Both positions and prices hold between their dates: held quantity is taken from the last
/// position snapshot on or before the day and price is the last known close (zero if there is no
/// any yet).
pub fn value_portfolio(history: &PositionHistory, prices: &ClosingPrices, period: Period) -> BTreeMap<Date, Decimal> {
    let mut calendar: Vec<Date> = prices.values()
        .flat_map(|quotes| quotes.range(period.first_date()..=period.last_date()).map(|(&date, _)| date))
        .collect();
    calendar.sort_unstable();
    calendar.dedup();

    calendar.into_iter().map(|date| {
        let value: Decimal = history.symbols().map(|symbol| {
            let quantity = history.get_as_of(symbol, date)
                .map(|snapshot| snapshot.quantity)
                .unwrap_or_default();

            if quantity.is_zero() {
                return Decimal::ZERO;
            }

            quantity * get_price_as_of(prices.get(symbol), date)
        }).sum();

        (date, value)
    }).collect()
}

fn get_price_as_of(quotes: Option<&HistoricalQuotes>, date: Date) -> Decimal {
    quotes.and_then(|quotes| quotes.range(..=date).next_back())
        .map(|(_, &price)| price)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;
    use pretty_assertions::assert_eq;
    use crate::positions::PositionSnapshot;
    use super::*;

    fn snapshot(symbol: &str, date: Date, quantity: Decimal) -> PositionSnapshot {
        PositionSnapshot {symbol: symbol.to_owned(), date, quantity, average_cost: dec!(1)}
    }

    fn history() -> PositionHistory {
        PositionHistory::new(btreemap! {
            s!("ITSA4") => vec![
                snapshot("ITSA4", date!(2022, 1, 4), dec!(100)),
                snapshot("ITSA4", date!(2022, 1, 6), dec!(150)),
            ],
            s!("TAEE11") => vec![
                snapshot("TAEE11", date!(2021, 6, 1), dec!(10)),
                snapshot("TAEE11", date!(2022, 1, 5), dec!(0)),
            ],
            s!("OIBR3") => vec![
                snapshot("OIBR3", date!(2019, 1, 2), dec!(1000)),
                snapshot("OIBR3", date!(2020, 1, 2), dec!(0)),
            ],
        })
    }

    #[test]
    fn held_symbols() {
        let period = Period::new(date!(2022, 1, 1), date!(2022, 1, 31)).unwrap();
        assert_eq!(get_held_symbols(&history(), period), vec!["ITSA4", "TAEE11"]);
    }

    #[test]
    fn valuation() {
        let prices = btreemap! {
            s!("ITSA4") => btreemap! {
                date!(2022, 1, 3) => dec!(9),
                date!(2022, 1, 4) => dec!(10),
                date!(2022, 1, 7) => dec!(11),
            },
            s!("TAEE11") => btreemap! {
                date!(2021, 12, 30) => dec!(35),
                date!(2022, 1, 4) => dec!(36),
                date!(2022, 1, 5) => dec!(37),
                date!(2022, 1, 6) => dec!(38),
            },
        };
        let period = Period::new(date!(2022, 1, 3), date!(2022, 1, 7)).unwrap();

        assert_eq!(value_portfolio(&history(), &prices, period), btreemap! {
            // ITSA4 isn't bought yet, TAEE11 price is carried from the previous year
            date!(2022, 1, 3) => dec!(350),
            date!(2022, 1, 4) => dec!(1000) + dec!(360),
            // No ITSA4 close, so it's carried
            date!(2022, 1, 5) => dec!(1000),
            date!(2022, 1, 6) => dec!(1500),
            date!(2022, 1, 7) => dec!(1650),
        });
    }

    #[test]
    fn missing_prices() {
        let prices = btreemap! {
            s!("TAEE11") => btreemap! {
                date!(2022, 1, 4) => dec!(36),
            },
        };
        let period = Period::new(date!(2022, 1, 1), date!(2022, 1, 31)).unwrap();

        // ITSA4 has no quotes at all and is valued as zero
        assert_eq!(value_portfolio(&history(), &prices, period), btreemap! {
            date!(2022, 1, 4) => dec!(360),
        });

        assert!(value_portfolio(&history(), &ClosingPrices::new(), period).is_empty());
    }
}
