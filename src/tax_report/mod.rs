//! Data for the annual income tax declaration: year-end positions ("bens e direitos") and income.

mod income;
mod year_end;

use itertools::Itertools;
use log::info;
use strum::IntoEnumIterator;

use crate::config::Config;
use crate::core::{EmptyResult, GenericResult};
use crate::formatting::table::{Cell, Row, Table, print_table};
use crate::positions::{PositionHistory, PositionTracker};
use crate::statement::{self, CanonicalRecord, IncomeCategory};

pub use self::income::{IncomeRecord, aggregate as aggregate_income};
pub use self::year_end::{YearEndPosition, calculate as calculate_year_end_positions};

/// Position history and income records calculated from all transaction exports.
pub struct Report {
    pub positions: PositionHistory,
    pub income: Vec<CanonicalRecord>,
}

impl Report {
    pub fn load(config: &Config) -> GenericResult<Report> {
        let statements = statement::read(config.get_statements_dir()?)?;
        Report::new(config, statements.positions, statements.income)
    }

    pub fn new(config: &Config, positions: Vec<CanonicalRecord>, income: Vec<CanonicalRecord>) -> GenericResult<Report> {
        let positions = PositionTracker::new(&config.price_overrides).track(&positions)?;
        info!("Calculated position history for {} securities.", positions.symbols().count());
        Ok(Report {positions, income})
    }
}

pub fn show_positions(config: &Config, year: Option<i32>) -> EmptyResult {
    let report = Report::load(config)?;
    let positions = calculate_year_end_positions(&report.positions, year);

    if positions.is_empty() {
        return Err!("There are no open positions{}", format_year(year));
    }

    for (year, positions) in &positions.iter().chunk_by(|position| position.year) {
        let mut table = Table::new();

        for position in positions {
            table.add_row(Row::new(&[
                Cell::new(&position.symbol),
                Cell::new_decimal(position.quantity),
                Cell::new_amount(position.average_cost),
                Cell::new_amount(position.value),
            ]));
        }

        print_table(&format!("Positions at 31.12.{year}"), &["Symbol", "Quantity", "Average cost", "Value"], table);
    }

    Ok(())
}

pub fn show_income(config: &Config, year: Option<i32>) -> EmptyResult {
    let report = Report::load(config)?;
    let income = aggregate_income(&report.income, year);

    if income.is_empty() {
        return Err!("There is no income{}", format_year(year));
    }

    let mut titles = vec!["Symbol"];
    titles.extend(IncomeCategory::iter().map(IncomeCategory::name));
    titles.push("Total");

    for (year, records) in &income.iter().chunk_by(|record| record.year) {
        let mut table = Table::new();

        for record in records {
            let mut row = vec![Cell::new(&record.symbol)];
            row.extend(IncomeCategory::iter().map(|category| Cell::new_amount(record.get(category))));
            row.push(Cell::new_amount(record.total()));
            table.add_row(Row::new(&row));
        }

        print_table(&format!("Income in {year}"), &titles, table);
    }

    Ok(())
}

pub fn show_history(config: &Config, symbol: Option<&str>) -> EmptyResult {
    let report = Report::load(config)?;

    let symbols: Vec<&str> = match symbol {
        Some(symbol) => {
            if report.positions.get(symbol).is_none() {
                return Err!("There are no {} transactions", symbol);
            }
            vec![symbol]
        },
        None => report.positions.symbols().collect(),
    };

    for symbol in symbols {
        let mut table = Table::new();

        for snapshot in report.positions.get(symbol).unwrap_or_default() {
            table.add_row(Row::new(&[
                Cell::new_date(snapshot.date),
                Cell::new_decimal(snapshot.quantity),
                Cell::new_amount(snapshot.average_cost),
            ]));
        }

        print_table(symbol, &["Date", "Quantity", "Average cost"], table);
    }

    Ok(())
}

fn format_year(year: Option<i32>) -> String {
    year.map(|year| format!(" in {year}")).unwrap_or_default()
}
