use log::trace;

use super::record::{CanonicalRecord, EventClass};

#[derive(Debug, Default)]
pub struct ClassifiedRecords {
    pub positions: Vec<CanonicalRecord>,
    pub income: Vec<CanonicalRecord>,
}

/// Splits records into position-affecting and income streams. Records of any other kind are
/// dropped.
pub fn classify(records: Vec<CanonicalRecord>) -> ClassifiedRecords {
    let mut classified = ClassifiedRecords::default();

    for record in records {
        match record.description.class() {
            Some(EventClass::Position) => classified.positions.push(record),
            Some(EventClass::Income(_)) => classified.income.push(record),
            None => trace!("Skipping {}.", record.brief()),
        }
    }

    classified
}
