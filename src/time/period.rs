use std::fmt;

use chrono::Months;

use crate::core::GenericResult;
use crate::formatting;

use super::Date;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Period {
    first: Date,
    last: Date,
}

impl Period {
    pub fn new(first: Date, last: Date) -> GenericResult<Period> {
        let period = Period {first, last};

        if period.first > period.last {
            return Err!("Invalid period: {period}");
        }

        Ok(period)
    }

    /// Lookback period of the specified number of years ending at (and including) `last`.
    pub fn last_years(last: Date, years: u32) -> GenericResult<Period> {
        let first = years.checked_mul(12)
            .and_then(|months| last.checked_sub_months(Months::new(months)))
            .and_then(|date| date.succ_opt())
            .ok_or_else(|| format!("Invalid lookback period: {years} years"))?;

        Period::new(first, last)
    }

    pub fn first_date(&self) -> Date {
        self.first
    }

    pub fn last_date(&self) -> Date {
        self.last
    }

    pub fn contains(&self, date: Date) -> bool {
        self.first <= date && date <= self.last
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", formatting::format_date(self.first), formatting::format_date(self.last))
    }
}
