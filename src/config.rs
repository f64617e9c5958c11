use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use log::debug;
use serde::Deserialize;

use crate::core::GenericResult;
use crate::corporate_actions::{PriceOverrideConfig, PriceOverrides};
use crate::time::deserialize_duration;

#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(skip)]
    pub config_dir: String,

    pub statements: Option<String>,

    #[serde(default, rename = "price_overrides")]
    price_override_configs: Vec<PriceOverrideConfig>,
    #[serde(skip)]
    pub price_overrides: PriceOverrides,

    #[serde(default)]
    pub quotes: QuotesConfig,
}

impl Config {
    pub fn new(config_dir: &str) -> GenericResult<Config> {
        let config_path = Path::new(config_dir).join("config.yaml");

        let mut config = match fs::read(&config_path) {
            Ok(data) => Config::load(&data).map_err(|e| format!(
                "Error while reading {:?} configuration file: {}", config_path, e))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{:?} doesn't exist. Using the default configuration.", config_path);
                Config::default()
            },
            Err(e) => return Err!("Error while reading {:?} configuration file: {}", config_path, e),
        };

        config.config_dir = config_dir.to_owned();
        Ok(config)
    }

    fn load(data: &[u8]) -> GenericResult<Config> {
        let mut config: Config = serde_yaml::from_slice(data)?;

        if let Some(statements) = config.statements.as_mut() {
            *statements = shellexpand::tilde(statements).to_string();
        }

        config.price_overrides = PriceOverrides::new(&config.price_override_configs)?;

        if config.quotes.years == 0 {
            return Err!("Invalid quotes lookback period: {} years", config.quotes.years);
        }

        Ok(config)
    }

    pub fn get_statements_dir(&self) -> GenericResult<&str> {
        Ok(self.statements.as_deref().ok_or(
            "Transaction exports directory is not set in the configuration file (use --statements)")?)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct QuotesConfig {
    #[serde(skip, default = "QuotesConfig::default_url")]
    pub url: String,

    #[serde(default = "QuotesConfig::default_symbol_suffix")]
    pub symbol_suffix: String,

    #[serde(default = "QuotesConfig::default_timeout", deserialize_with = "deserialize_duration")]
    pub timeout: Duration,

    #[serde(default = "QuotesConfig::default_max_retry_time", deserialize_with = "deserialize_duration")]
    pub max_retry_time: Duration,

    #[serde(default = "QuotesConfig::default_years")]
    pub years: u32,
}

impl QuotesConfig {
    fn default_url() -> String {
        "https://query1.finance.yahoo.com".to_owned()
    }

    fn default_symbol_suffix() -> String {
        ".SA".to_owned()
    }

    fn default_timeout() -> Duration {
        Duration::from_secs(30)
    }

    fn default_max_retry_time() -> Duration {
        Duration::from_secs(60)
    }

    fn default_years() -> u32 {
        5
    }
}

impl Default for QuotesConfig {
    fn default() -> QuotesConfig {
        QuotesConfig {
            url: QuotesConfig::default_url(),
            symbol_suffix: QuotesConfig::default_symbol_suffix(),
            timeout: QuotesConfig::default_timeout(),
            max_retry_time: QuotesConfig::default_max_retry_time(),
            years: QuotesConfig::default_years(),
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use super::*;

    #[test]
    fn missing_config() {
        let config_dir = tempfile::tempdir().unwrap();
        let config = Config::new(config_dir.path().to_str().unwrap()).unwrap();

        assert_eq!(config.statements, None);
        assert!(config.price_overrides.is_empty());
        assert_eq!(config.quotes.symbol_suffix, ".SA");
        assert_eq!(config.quotes.timeout, Duration::from_secs(30));
        assert_eq!(config.quotes.years, 5);
        assert!(config.get_statements_dir().is_err());
    }

    #[test]
    fn full_config() {
        let config_dir = tempfile::tempdir().unwrap();
        fs::write(config_dir.path().join("config.yaml"), indoc!("
            statements: /var/lib/irpf/exports

            price_overrides:
              - symbol: ITSA4
                date: 22.12.2021
                price: 18.88
              - symbol: BBSE3
                date: 2020.01.02
                price: 30

            quotes:
              symbol_suffix: .SAO
              timeout: 10s
              max_retry_time: 5m
              years: 2
        ")).unwrap();

        let config = Config::new(config_dir.path().to_str().unwrap()).unwrap();

        assert_eq!(config.get_statements_dir().unwrap(), "/var/lib/irpf/exports");
        assert_eq!(config.price_overrides.len(), 2);
        assert_eq!(config.price_overrides.get("ITSA4", date!(2021, 12, 22)), Some(dec!(18.88)));
        assert_eq!(config.price_overrides.get("BBSE3", date!(2020, 1, 2)), Some(dec!(30)));
        assert_eq!(config.quotes.symbol_suffix, ".SAO");
        assert_eq!(config.quotes.timeout, Duration::from_secs(10));
        assert_eq!(config.quotes.max_retry_time, Duration::from_secs(300));
        assert_eq!(config.quotes.years, 2);
    }

    #[test]
    fn invalid_config() {
        for data in [
            "unknown: value",
            "quotes: {timeout: 1w}",
            "quotes: {years: 0}",
            indoc!("
                price_overrides:
                  - {symbol: ITSA4, date: 22.12.2021, price: 18.88}
                  - {symbol: ITSA4, date: 2021.12.22, price: 18.88}
            "),
        ] {
            assert!(Config::load(data.as_bytes()).is_err(), "{data}");
        }
    }

    #[test]
    fn statements_expansion() {
        let config = Config::load(b"statements: ~/exports").unwrap();
        assert!(!config.get_statements_dir().unwrap().starts_with('~'));
    }
}
