mod parsing;
mod period;

use chrono::Local;

pub use crate::types::Date;

pub use parsing::*;
pub use period::*;

pub fn today() -> Date {
    Local::now().date_naive()
}
