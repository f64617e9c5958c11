use chrono::Datelike;
use itertools::Itertools;

use crate::positions::PositionHistory;
use crate::types::Decimal;
use crate::util;

#[derive(Debug, Clone, PartialEq)]
pub struct YearEndPosition {
    pub year: i32,
    pub symbol: String,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    pub value: Decimal,
}

/// Takes the last position state of each security for each year it has activity in. Positions
/// closed by the end of the year are omitted.
pub fn calculate(history: &PositionHistory, year: Option<i32>) -> Vec<YearEndPosition> {
    let mut positions = Vec::new();

    for (symbol, snapshots) in history.iter() {
        for year_snapshots in snapshots.chunk_by(|a, b| a.date.year() == b.date.year()) {
            let Some(last) = year_snapshots.last() else {
                continue;
            };

            let position_year = last.date.year();
            if year.is_some_and(|year| year != position_year) || last.quantity.is_zero() {
                continue;
            }

            positions.push(YearEndPosition {
                year: position_year,
                symbol: symbol.to_owned(),
                quantity: util::round_to_even(last.quantity, 2),
                average_cost: util::round_to_even(last.average_cost, 2),
                value: util::round_to_even(last.quantity * last.average_cost, 2),
            });
        }
    }

    positions.into_iter()
        .sorted_by(|a, b| (a.year, &a.symbol).cmp(&(b.year, &b.symbol)))
        .collect()
}
