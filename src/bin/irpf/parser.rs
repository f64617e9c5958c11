use clap::{ArgAction, ArgMatches};

use irpf::cli;
use irpf::config::Config;
use irpf::core::GenericResult;
use irpf::types::Date;

use super::action::Action;

const DEFAULT_CONFIG_DIR_PATH: &str = "~/.irpf";

pub struct Parser {
    matches: Option<ArgMatches>,
}

pub struct GlobalOptions {
    pub log_level: log::Level,
    pub config_dir: String,
}

impl Parser {
    pub fn new() -> Parser {
        Parser {matches: None}
    }

    pub fn parse_global(&mut self) -> GenericResult<GlobalOptions> {
        let matches = cli::new_app("irpf", "Prepares brokerage data for the annual income tax declaration")
            .version(env!("CARGO_PKG_VERSION"))
            .subcommand_required(true)
            .arg_required_else_help(true)
            .args([
                cli::new_arg("config", "Configuration directory path [default: ~/.irpf]")
                    .short('c').long("config")
                    .value_name("PATH")
                    .global(true),

                cli::new_arg("statements", "Transaction exports directory path (overrides the configuration file)")
                    .short('s').long("statements")
                    .value_name("PATH")
                    .global(true),

                cli::new_arg("verbose", "Set verbosity level")
                    .short('v').long("verbose")
                    .action(ArgAction::Count)
                    .global(true),
            ])

            .subcommand(cli::new_subcommand(
                "positions", "Show positions at the end of the year")
                .long_about("\
                    Calculates average cost of each security and shows positions at the end of \
                    each year (or the specified one) as they should be declared in the \
                    \"Bens e Direitos\" section. Closed positions are omitted.")
                .arg(cli::new_arg("YEAR", "Year to show the positions for")))

            .subcommand(cli::new_subcommand(
                "income", "Show income received from securities")
                .long_about("Shows dividends, interest on capital and yields per security and year")
                .arg(cli::new_arg("YEAR", "Year to show the income for")))

            .subcommand(cli::new_subcommand(
                "history", "Show position history")
                .long_about("Shows quantity and average cost after each position-affecting event")
                .arg(cli::new_arg("SYMBOL", "Security to show the history for")))

            .subcommand(cli::new_subcommand(
                "portfolio", "Show daily portfolio value")
                .arg(cli::new_arg("years", "Lookback period in years [default: from the configuration file]")
                    .short('y').long("years")
                    .value_name("YEARS")))

            .get_matches();

        let log_level = match matches.get_count("verbose") {
            0 => log::Level::Info,
            1 => log::Level::Debug,
            2 => log::Level::Trace,
            _ => return Err("Invalid verbosity level".into()),
        };

        let config_dir = matches.get_one::<String>("config").cloned().unwrap_or_else(||
            shellexpand::tilde(DEFAULT_CONFIG_DIR_PATH).to_string());

        self.matches = Some(matches);

        Ok(GlobalOptions {log_level, config_dir})
    }

    pub fn parse(mut self, config: &mut Config) -> GenericResult<(String, Action)> {
        let matches = self.matches.take().ok_or("The command line is not parsed yet")?;

        let (command, matches) = matches.subcommand().ok_or("Command is not specified")?;

        if let Some(statements) = matches.get_one::<String>("statements") {
            config.statements = Some(shellexpand::tilde(statements).to_string());
        }

        let action = parse_command(command, matches)?;
        Ok((command.to_owned(), action))
    }
}

fn parse_command(command: &str, matches: &ArgMatches) -> GenericResult<Action> {
    Ok(match command {
        "positions" => Action::Positions {year: get_year(matches)?},
        "income" => Action::Income {year: get_year(matches)?},
        "history" => Action::History {
            symbol: matches.get_one::<String>("SYMBOL").map(|symbol| symbol.to_uppercase()),
        },
        "portfolio" => Action::Portfolio {
            years: matches.get_one::<String>("years").map(|years| {
                match years.parse::<u32>() {
                    Ok(years) if years > 0 => Ok(years),
                    _ => Err(format!("Invalid lookback period: {:?}", years)),
                }
            }).transpose()?,
        },
        _ => return Err(format!("Unexpected command: {}", command).into()),
    })
}

fn get_year(matches: &ArgMatches) -> GenericResult<Option<i32>> {
    matches.get_one::<String>("YEAR").map(|year| {
        Ok(year.parse::<i32>().ok()
            .and_then(|year| Date::from_ymd_opt(year, 1, 1).and(Some(year)))
            .ok_or_else(|| format!("Invalid year: {}", year))?)
    }).transpose()
}
