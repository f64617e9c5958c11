//! Brokerage transaction export: reading, normalization and classification.

mod classifier;
mod normalizer;
mod raw;
mod reader;
mod record;

use log::info;

use crate::core::GenericResult;

pub use self::classifier::{ClassifiedRecords, classify};
pub use self::normalizer::{adjust, normalize, normalize_all};
pub use self::raw::RawTransaction;
pub use self::reader::read_transactions;
pub use self::record::{CanonicalRecord, Description, EventClass, EventType, IncomeCategory};

pub fn read(statement_dir_path: &str) -> GenericResult<ClassifiedRecords> {
    let transactions = read_transactions(statement_dir_path)?;
    let classified = classify(normalize_all(&transactions)?);

    info!("Got {} position-affecting and {} income records.",
          classified.positions.len(), classified.income.len());

    Ok(classified)
}
