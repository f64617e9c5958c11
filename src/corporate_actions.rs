//! Authoritative prices for corporate actions which are reported without any price in the
//! brokerage export (bonus share grants mostly).

use std::collections::{HashMap, hash_map};

use log::debug;
use serde::Deserialize;

use crate::core::{EmptyResult, GenericResult};
use crate::formatting::format_date;
use crate::statement::CanonicalRecord;
use crate::time::deserialize_date;
use crate::types::{Date, Decimal};
use crate::util;

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct PriceOverrideConfig {
    pub symbol: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: Date,
    pub price: Decimal,
}

#[derive(Default, Debug)]
pub struct PriceOverrides {
    prices: HashMap<(String, Date), Decimal>,
}

impl PriceOverrides {
    pub fn new(config: &[PriceOverrideConfig]) -> GenericResult<PriceOverrides> {
        let mut overrides = PriceOverrides::default();

        for price_override in config {
            overrides.add(&price_override.symbol, price_override.date, price_override.price)?;
        }

        Ok(overrides)
    }

    pub fn add(&mut self, symbol: &str, date: Date, price: Decimal) -> EmptyResult {
        let price = util::validate_positive_decimal(price).map_err(|_| format!(
            "Invalid {} price override for {}: {}", symbol, format_date(date), price))?;

        match self.prices.entry((symbol.to_owned(), date)) {
            hash_map::Entry::Vacant(entry) => entry.insert(price),
            hash_map::Entry::Occupied(_) => return Err!(
                "Got a duplicated {} price override for {}", symbol, format_date(date)),
        };

        Ok(())
    }

    pub fn get(&self, symbol: &str, date: Date) -> Option<Decimal> {
        self.prices.get(&(symbol.to_owned(), date)).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Patches unit price and total value of all records matching an override key. Total value is
    /// calculated from the quantity of the first record with the key, so it's applied only once
    /// even if several records share the key.
    pub fn apply(&self, records: &mut [CanonicalRecord]) {
        if self.prices.is_empty() {
            return;
        }

        let mut quantities: HashMap<(&str, Date), Decimal> = HashMap::new();
        for record in records.iter() {
            if self.get(&record.symbol, record.date).is_some() {
                quantities.entry((&record.symbol, record.date)).or_insert(record.quantity);
            }
        }

        let patches: Vec<(usize, Decimal, Decimal)> = records.iter().enumerate().filter_map(|(index, record)| {
            let price = self.get(&record.symbol, record.date)?;
            let quantity = quantities[&(record.symbol.as_str(), record.date)];
            Some((index, price, price * quantity))
        }).collect();

        for (index, price, total_value) in patches {
            let record = &mut records[index];
            debug!("Overriding price of {}: {} ({} total).", record.brief(), price, total_value);
            record.unit_price = Some(price);
            record.total_value = Some(total_value);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::statement::{Description, EventType};
    use super::*;

    fn record(symbol: &str, date: Date, quantity: Decimal) -> CanonicalRecord {
        CanonicalRecord {
            symbol: symbol.to_owned(),
            date,
            event_type: EventType::Credit,
            description: Description::BonusGrant,
            quantity,
            unit_price: None,
            total_value: None,
        }
    }

    #[test]
    fn apply() {
        let mut overrides = PriceOverrides::default();
        overrides.add("ITSA4", date!(2021, 12, 22), dec!(18.88)).unwrap();
        overrides.add("BBSE3", date!(2020, 1, 1), dec!(30)).unwrap();

        let mut records = vec![
            record("ITSA4", date!(2021, 12, 21), dec!(100)),
            record("ITSA4", date!(2021, 12, 22), dec!(10)),
            record("ITSA4", date!(2021, 12, 22), dec!(3)),
            record("TAEE11", date!(2021, 12, 22), dec!(5)),
        ];
        overrides.apply(&mut records);

        assert_eq!((records[0].unit_price, records[0].total_value), (None, None));
        assert_eq!((records[1].unit_price, records[1].total_value), (Some(dec!(18.88)), Some(dec!(188.8))));
        assert_eq!((records[2].unit_price, records[2].total_value), (Some(dec!(18.88)), Some(dec!(188.8))));
        assert_eq!((records[3].unit_price, records[3].total_value), (None, None));
    }

    #[test]
    fn configuration() {
        let overrides = PriceOverrides::new(&[
            PriceOverrideConfig {symbol: s!("ITSA4"), date: date!(2021, 12, 22), price: dec!(18.88)},
            PriceOverrideConfig {symbol: s!("ITSA4"), date: date!(2019, 11, 18), price: dec!(13.14)},
        ]).unwrap();
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.get("ITSA4", date!(2019, 11, 18)), Some(dec!(13.14)));
        assert_eq!(overrides.get("ITSA4", date!(2019, 11, 19)), None);

        assert_eq!(PriceOverrides::new(&[
            PriceOverrideConfig {symbol: s!("ITSA4"), date: date!(2021, 12, 22), price: dec!(18.88)},
            PriceOverrideConfig {symbol: s!("ITSA4"), date: date!(2021, 12, 22), price: dec!(18.00)},
        ]).unwrap_err().to_string(), "Got a duplicated ITSA4 price override for 22.12.2021");

        assert_eq!(PriceOverrides::new(&[
            PriceOverrideConfig {symbol: s!("ITSA4"), date: date!(2021, 12, 22), price: dec!(0)},
        ]).unwrap_err().to_string(), "Invalid ITSA4 price override for 22.12.2021: 0");
    }
}
