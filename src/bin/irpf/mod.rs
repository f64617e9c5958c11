mod action;
mod parser;

use std::io::{self, Write};
use std::process::ExitCode;

use log::{debug, error};

use irpf::config::Config;
use irpf::core::EmptyResult;
use irpf::portfolio;
use irpf::tax_report;

use self::action::Action;
use self::parser::{Parser, GlobalOptions};

fn main() -> ExitCode {
    let mut parser = Parser::new();

    let global = match parser.parse_global() {
        Ok(global) => global,
        Err(err) => {
            let _ = writeln!(io::stderr(), "{err}.");
            return ExitCode::FAILURE;
        },
    };

    if let Err(err) = easy_logging::init(module_path!(), global.log_level) {
        let _ = writeln!(io::stderr(), "Failed to initialize the logging: {err}.");
        return ExitCode::FAILURE;
    }

    if let Err(err) = run(global, parser) {
        let message = err.to_string();

        if message.contains('\n') {
            error!("{err}");
        } else {
            error!("{err}.");
        }

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn run(global: GlobalOptions, parser: Parser) -> EmptyResult {
    let mut config = Config::new(&global.config_dir)?;
    let (command, action) = parser.parse(&mut config)?;
    debug!("Running {command} command...");

    match action {
        Action::Positions {year} => tax_report::show_positions(&config, year)?,
        Action::Income {year} => tax_report::show_income(&config, year)?,
        Action::History {symbol} => tax_report::show_history(&config, symbol.as_deref())?,
        Action::Portfolio {years} => portfolio::show(&config, years)?,
    };

    Ok(())
}
