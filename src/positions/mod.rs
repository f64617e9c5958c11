//! Average cost ("preço médio") position tracking.

mod tracker;

use std::collections::BTreeMap;

use crate::types::Date;

pub use self::tracker::{PositionSnapshot, PositionState, PositionTracker, QUANTITY_EPSILON, replay};

/// Per-security position snapshots ordered by date.
#[derive(Debug, Default)]
pub struct PositionHistory {
    securities: BTreeMap<String, Vec<PositionSnapshot>>,
}

impl PositionHistory {
    pub fn new(securities: BTreeMap<String, Vec<PositionSnapshot>>) -> PositionHistory {
        PositionHistory {securities}
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.securities.keys().map(String::as_str)
    }

    pub fn get(&self, symbol: &str) -> Option<&[PositionSnapshot]> {
        self.securities.get(symbol).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PositionSnapshot])> {
        self.securities.iter().map(|(symbol, snapshots)| (symbol.as_str(), snapshots.as_slice()))
    }

    /// Position state as of the end of the specified day: the last snapshot on or before it.
    pub fn get_as_of(&self, symbol: &str, date: Date) -> Option<&PositionSnapshot> {
        let snapshots = self.get(symbol)?;
        let count = snapshots.partition_point(|snapshot| snapshot.date <= date);
        count.checked_sub(1).map(|index| &snapshots[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(day: u32, quantity: u32) -> PositionSnapshot {
        PositionSnapshot {
            symbol: s!("BBAS3"),
            date: date!(2022, 3, day),
            quantity: quantity.into(),
            average_cost: dec!(30),
        }
    }

    #[test]
    fn as_of() {
        let history = PositionHistory::new(BTreeMap::from([(s!("BBAS3"), vec![
            snapshot(2, 10),
            snapshot(4, 20),
            snapshot(4, 25),
            snapshot(8, 5),
        ])]));

        assert_eq!(history.get_as_of("BBAS3", date!(2022, 3, 1)), None);
        assert_eq!(history.get_as_of("BBAS3", date!(2022, 3, 2)).unwrap().quantity, dec!(10));
        assert_eq!(history.get_as_of("BBAS3", date!(2022, 3, 3)).unwrap().quantity, dec!(10));
        assert_eq!(history.get_as_of("BBAS3", date!(2022, 3, 4)).unwrap().quantity, dec!(25));
        assert_eq!(history.get_as_of("BBAS3", date!(2022, 3, 31)).unwrap().quantity, dec!(5));
        assert_eq!(history.get_as_of("ITSA4", date!(2022, 3, 31)), None);
    }
}
