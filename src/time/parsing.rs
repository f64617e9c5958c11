use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde::de::{Deserializer, Error};

use crate::core::GenericResult;

use super::Date;

pub fn parse_date(date: &str, format: &str) -> GenericResult<Date> {
    Ok(Date::parse_from_str(date, format).map_err(|_| format!(
        "Invalid date: {:?}", date))?)
}

pub fn parse_user_date(date: &str) -> GenericResult<Date> {
    parse_date(date, "%Y.%m.%d").or_else(|_| parse_date(date, "%d.%m.%Y"))
}

pub fn deserialize_date<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where D: Deserializer<'de>
{
    let date: String = Deserialize::deserialize(deserializer)?;
    parse_user_date(&date).map_err(D::Error::custom)
}

pub fn parse_duration(string: &str) -> GenericResult<Duration> {
    lazy_static! {
        static ref REGEX: Regex = Regex::new(r"^(?P<number>[1-9]\d*)(?P<unit>[smhd])$").unwrap();
    }

    let seconds = REGEX.captures(string).and_then(|captures| {
        let duration = captures.name("number").unwrap().as_str().parse::<u64>().ok()?;

        duration.checked_mul(match captures.name("unit").unwrap().as_str() {
            "s" => 1,
            "m" => 60,
            "h" => 60 * 60,
            "d" => 60 * 60 * 24,
            _ => unreachable!(),
        })
    }).ok_or_else(|| format!("Invalid duration: {}", string))?;

    Ok(Duration::from_secs(seconds))
}

pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where D: Deserializer<'de>
{
    let duration: String = Deserialize::deserialize(deserializer)?;
    parse_duration(&duration).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use super::*;

    #[rstest(string, expected,
        case("2021.03.24", date!(2021, 3, 24)),
        case("24.03.2021", date!(2021, 3, 24)),
    )]
    fn user_date(string: &str, expected: Date) {
        assert_eq!(parse_user_date(string).unwrap(), expected);
    }

    #[test]
    fn export_date() {
        assert_eq!(parse_date("05/01/2022", "%d/%m/%Y").unwrap(), date!(2022, 1, 5));
        assert_eq!(parse_date("2022-01-05", "%d/%m/%Y").unwrap_err().to_string(), r#"Invalid date: "2022-01-05""#);
    }

    #[rstest(string, seconds,
        case("30s", 30),
        case("2m", 120),
        case("1h", 3600),
        case("1d", 86400),
    )]
    fn duration(string: &str, seconds: u64) {
        assert_eq!(parse_duration(string).unwrap(), Duration::from_secs(seconds));
    }

    #[rstest(string,
        case("0s"),
        case("10"),
        case("1w"),
    )]
    fn invalid_duration(string: &str) {
        assert!(parse_duration(string).is_err());
    }
}
