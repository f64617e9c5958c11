use std::collections::BTreeMap;

use log::{trace, warn};
use rayon::prelude::*;

use crate::core::GenericResult;
use crate::corporate_actions::PriceOverrides;
use crate::statement::{CanonicalRecord, Description};
use crate::types::{Date, Decimal};
use crate::util;

use super::PositionHistory;

/// Quantities are derived from decimal values of different origin, so they are compared with
/// this tolerance.
pub const QUANTITY_EPSILON: Decimal = dec!(0.000001);

/// Position state after an event.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSnapshot {
    pub symbol: String,
    pub date: Date,
    pub quantity: Decimal,
    pub average_cost: Decimal,
}

/// Running accumulator of the replay. Zero average cost means that there is no open position and
/// the cost basis will be seeded by the next event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionState {
    pub quantity: Decimal,
    pub average_cost: Decimal,
}

impl PositionState {
    /// Calculates the state after the specified event: quantity is updated first and the average
    /// cost is calculated using the already updated quantity.
    pub fn next(self, record: &CanonicalRecord) -> GenericResult<PositionState> {
        let quantity = self.next_quantity(record);
        let average_cost = self.next_average_cost(record, quantity)?;
        Ok(PositionState {quantity, average_cost})
    }

    fn next_quantity(&self, record: &CanonicalRecord) -> Decimal {
        let base = match record.description {
            // Some updates are just renames or reissues which restate the whole position
            Description::Update if util::approx_eq(record.quantity, self.quantity, QUANTITY_EPSILON) => {
                trace!("{}: Treating as restatement of {} shares.", record.brief(), self.quantity);
                Decimal::ZERO
            },
            Description::FractionalSettlement => self.quantity.floor(),
            _ => self.quantity,
        };

        let quantity = base + record.quantity;

        if util::approx_eq(quantity, Decimal::ZERO, QUANTITY_EPSILON) {
            Decimal::ZERO
        } else {
            quantity
        }
    }

    fn next_average_cost(&self, record: &CanonicalRecord, quantity: Decimal) -> GenericResult<Decimal> {
        let average_cost = if self.average_cost.is_zero() {
            seed_average_cost(record)?
        } else if quantity.is_zero() {
            Decimal::ZERO
        } else if let Some(unit_price) = get_acquisition_price(record) {
            let total_value = record.total_value.unwrap_or(unit_price * record.quantity);
            ((quantity - record.quantity) * self.average_cost + total_value) / quantity
        } else {
            self.average_cost
        };

        Ok(if quantity.is_zero() {
            Decimal::ZERO
        } else {
            average_cost
        })
    }
}

fn get_acquisition_price(record: &CanonicalRecord) -> Option<Decimal> {
    // Unit price is negated for debits, so disposals never match
    record.unit_price.filter(|price| price.is_sign_positive() && !price.is_zero())
}

fn seed_average_cost(record: &CanonicalRecord) -> GenericResult<Decimal> {
    if record.quantity.is_zero() {
        return Err!("Corrupt input: {} has zero quantity and can't seed the average cost", record.brief());
    }

    let total_value = record.total_value.ok_or_else(|| format!(
        "Corrupt input: {} has no total value and can't seed the average cost", record.brief()))?;

    Ok(total_value / record.quantity)
}

/// Replays position-affecting events of a single security which must be ordered by date and
/// returns position snapshot for each of them.
pub fn replay(symbol: &str, records: &[CanonicalRecord]) -> GenericResult<Vec<PositionSnapshot>> {
    let (_, snapshots) = records.iter().try_fold(
        (PositionState::default(), Vec::with_capacity(records.len())),
        |(state, mut snapshots), record| -> GenericResult<_> {
            if record.symbol != symbol {
                return Err!("Got an unexpected {} record while replaying {} position", record.symbol, symbol);
            }

            if let Some(last) = snapshots.last().map(|snapshot: &PositionSnapshot| snapshot.date) {
                if record.date < last {
                    return Err!("{} position history is not ordered by date", symbol);
                }
            }

            let state = state.next(record)?;
            if state.quantity.is_sign_negative() && !state.quantity.is_zero() {
                warn!("{}: Got a negative position: {}.", record.brief(), state.quantity);
            }

            snapshots.push(PositionSnapshot {
                symbol: symbol.to_owned(),
                date: record.date,
                quantity: state.quantity,
                average_cost: state.average_cost,
            });

            Ok((state, snapshots))
        })?;

    Ok(snapshots)
}

pub struct PositionTracker<'a> {
    overrides: &'a PriceOverrides,
}

impl<'a> PositionTracker<'a> {
    pub fn new(overrides: &'a PriceOverrides) -> PositionTracker<'a> {
        PositionTracker {overrides}
    }

    /// Orders position-affecting records by security and date (keeping source order for the same
    /// day), applies price overrides and replays each security independently.
    pub fn track(&self, records: &[CanonicalRecord]) -> GenericResult<PositionHistory> {
        let mut records = records.to_vec();
        records.sort_by(|a, b| (&a.symbol, a.date).cmp(&(&b.symbol, b.date)));
        self.overrides.apply(&mut records);

        let securities: Vec<&[CanonicalRecord]> = records.chunk_by(|a, b| a.symbol == b.symbol).collect();

        let histories = securities.par_iter().map(|records| -> GenericResult<(String, Vec<PositionSnapshot>)> {
            let symbol = &records[0].symbol;
            let snapshots = replay(symbol, records).map_err(|e| format!(
                "Failed to calculate {} position: {}", symbol, e))?;
            Ok((symbol.clone(), snapshots))
        }).collect::<GenericResult<BTreeMap<String, Vec<PositionSnapshot>>>>()?;

        Ok(PositionHistory::new(histories))
    }
}
