use std::collections::BTreeMap;

use chrono::Datelike;
use log::{trace, warn};
use strum::IntoEnumIterator;

use crate::statement::{CanonicalRecord, EventClass, IncomeCategory};
use crate::types::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct IncomeRecord {
    pub year: i32,
    pub symbol: String,
    pub amounts: BTreeMap<IncomeCategory, Decimal>,
}

impl IncomeRecord {
    fn new(year: i32, symbol: &str) -> IncomeRecord {
        IncomeRecord {
            year,
            symbol: symbol.to_owned(),
            amounts: IncomeCategory::iter().map(|category| (category, Decimal::ZERO)).collect(),
        }
    }

    pub fn get(&self, category: IncomeCategory) -> Decimal {
        self.amounts.get(&category).copied().unwrap_or_default()
    }

    pub fn total(&self) -> Decimal {
        self.amounts.values().sum()
    }
}

/// Sums income per year, security and category. Each resulting record has an amount for every
/// income category.
pub fn aggregate(records: &[CanonicalRecord], year: Option<i32>) -> Vec<IncomeRecord> {
    let mut income: BTreeMap<(i32, &str), IncomeRecord> = BTreeMap::new();

    for record in records {
        let record_year = record.date.year();
        if year.is_some_and(|year| year != record_year) {
            continue;
        }

        let Some(EventClass::Income(category)) = record.description.class() else {
            trace!("Skipping {}: it's not an income.", record.brief());
            continue;
        };

        let Some(amount) = record.total_value else {
            warn!("Skipping {}: it has no amount.", record.brief());
            continue;
        };

        let entry = income.entry((record_year, &record.symbol))
            .or_insert_with(|| IncomeRecord::new(record_year, &record.symbol));
        *entry.amounts.entry(category).or_default() += amount;
    }

    income.into_values().collect()
}
