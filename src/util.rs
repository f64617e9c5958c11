use std::str::FromStr;

use rust_decimal::RoundingStrategy;

use crate::core::GenericResult;
use crate::types::Decimal;

pub fn validate_positive_decimal(value: Decimal) -> GenericResult<Decimal> {
    if !value.is_sign_positive() || value.is_zero() {
        return Err!("The value must be positive");
    }
    Ok(value)
}

/// Parses a decimal written either with a decimal comma (`1.234,56`) or a decimal point (`1234.56`).
///
/// When the string contains a comma, it's treated as the decimal separator and all dots are
/// considered to be thousands separators.
pub fn parse_localized_decimal(string: &str) -> GenericResult<Decimal> {
    let string = string.trim().replace(['\u{a0}', ' '], "");

    let normalized = if string.contains(',') {
        if string.matches(',').count() > 1 {
            return Err!("Invalid decimal value: {:?}", string);
        }
        string.replace('.', "").replace(',', ".")
    } else {
        string
    };

    Ok(Decimal::from_str(&normalized).or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|_| format!("Invalid decimal value: {:?}", normalized))?)
}

pub fn round_to(value: Decimal, points: u32) -> Decimal {
    value.round_dp_with_strategy(points, RoundingStrategy::MidpointAwayFromZero).normalize()
}

/// Banker's rounding: midpoints go to the even neighbour.
pub fn round_to_even(value: Decimal, points: u32) -> Decimal {
    value.round_dp_with_strategy(points, RoundingStrategy::MidpointNearestEven).normalize()
}

pub fn approx_eq(a: Decimal, b: Decimal, epsilon: Decimal) -> bool {
    (a - b).abs() <= epsilon
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use super::*;

    #[rstest(string, expected,
        case("10", dec!(10)),
        case("10,5", dec!(10.5)),
        case("10.5", dec!(10.5)),
        case("1.234,56", dec!(1234.56)),
        case(" -1.234.567,8 ", dec!(-1234567.8)),
        case("0,0001", dec!(0.0001)),
        case("1e-3", dec!(0.001)),
    )]
    fn localized_decimal_parsing(string: &str, expected: Decimal) {
        assert_eq!(parse_localized_decimal(string).unwrap(), expected);
    }

    #[rstest(string,
        case(""),
        case("-"),
        case("1,2,3"),
        case("abc"),
    )]
    fn invalid_localized_decimal(string: &str) {
        assert!(parse_localized_decimal(string).is_err());
    }

    #[rstest(value, expected,
        case(dec!(1.005), dec!(1.01)),
        case(dec!(1.004), dec!(1.00)),
        case(dec!(-2.345), dec!(-2.35)),
        case(dec!(110), dec!(110)),
    )]
    fn rounding(value: Decimal, expected: Decimal) {
        assert_eq!(round_to(value, 2), expected);
    }

    #[rstest(value, expected,
        case(dec!(0.125), dec!(0.12)),
        case(dec!(0.135), dec!(0.14)),
        case(dec!(1.0051), dec!(1.01)),
        case(dec!(-2.345), dec!(-2.34)),
    )]
    fn rounding_to_even(value: Decimal, expected: Decimal) {
        assert_eq!(round_to_even(value, 2), expected);
    }

    #[rstest(value, valid,
        case(dec!(1.5), true),
        case(dec!(0.0001), true),
        case(dec!(0), false),
        case(dec!(-0), false),
        case(dec!(-1), false),
    )]
    fn positive_decimal_validation(value: Decimal, valid: bool) {
        assert_eq!(validate_positive_decimal(value).is_ok(), valid);
    }
}
