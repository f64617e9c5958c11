#[macro_use] pub mod core;
#[macro_use] pub mod types;

pub mod cli;
pub mod config;
pub mod corporate_actions;
pub mod formats;
pub mod formatting;
pub mod http;
pub mod portfolio;
pub mod positions;
pub mod quotes;
pub mod statement;
pub mod tax_report;
pub mod time;
pub mod util;
