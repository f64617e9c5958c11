mod valuation;

use log::info;

use crate::config::Config;
use crate::core::EmptyResult;
use crate::formatting::table::{Cell, Row, Table, print_table};
use crate::quotes::{self, Yahoo};
use crate::tax_report::Report;
use crate::time::{self, Period};

pub use self::valuation::{get_held_symbols, value_portfolio};

pub fn show(config: &Config, years: Option<u32>) -> EmptyResult {
    let report = Report::load(config)?;

    let period = Period::last_years(time::today(), years.unwrap_or(config.quotes.years))?;
    let symbols = get_held_symbols(&report.positions, period);
    if symbols.is_empty() {
        return Err!("There are no open positions in {}", period);
    }

    info!("Getting quotes for {} securities...", symbols.len());
    let provider = Yahoo::new(&config.quotes)?;
    let prices = quotes::get_closing_prices(&provider, &symbols, period)?;

    let values = value_portfolio(&report.positions, &prices, period);
    if values.is_empty() {
        return Err!("There are no quotes for {}", period);
    }

    let mut table = Table::new();
    for (&date, &value) in &values {
        table.add_row(Row::new(&[Cell::new_date(date), Cell::new_amount(value)]));
    }
    print_table(&format!("Portfolio value ({period})"), &["Date", "Value"], table);

    Ok(())
}
