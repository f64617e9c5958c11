use log::trace;

use crate::core::GenericResult;
use crate::time;
use crate::types::Decimal;
use crate::util;

use super::raw::RawTransaction;
use super::record::{CanonicalRecord, Description, EventType};

/// Normalizes all export rows skipping the ones of unknown kind: they are never used, so they aren't
/// validated either.
pub fn normalize_all(transactions: &[RawTransaction]) -> GenericResult<Vec<CanonicalRecord>> {
    transactions.iter().enumerate().filter(|(_, transaction)| {
        let description = Description::parse(&transaction.description);
        let known = description.class().is_some();
        if !known {
            trace!("Skipping {:?} {} transaction.", transaction.product, description);
        }
        known
    }).map(|(index, transaction)| {
        normalize(transaction).map(adjust).map_err(|e| format!(
            "Invalid #{} transaction ({:?}): {}", index + 1, transaction.product, e).into())
    }).collect()
}

/// Converts an export row into a canonical record without any sign adjustment.
pub fn normalize(transaction: &RawTransaction) -> GenericResult<CanonicalRecord> {
    let symbol = get_symbol(&transaction.product)?;
    let event_type = EventType::parse(&transaction.direction)?;
    let date = time::parse_date(transaction.date.trim(), "%d/%m/%Y")?;
    let description = Description::parse(&transaction.description);

    let quantity = util::parse_localized_decimal(&transaction.quantity).map_err(|_| format!(
        "Invalid quantity: {:?}", transaction.quantity))?;

    Ok(CanonicalRecord {
        symbol, date, event_type, description, quantity,
        unit_price: parse_optional_decimal("unit price", transaction.unit_price.as_deref()),
        total_value: parse_optional_decimal("total value", transaction.total_value.as_deref()),
    })
}

/// Resolves sign of the movement: debits negate quantity, unit price and total value.
pub fn adjust(mut record: CanonicalRecord) -> CanonicalRecord {
    if record.event_type == EventType::Debit {
        record.quantity = -record.quantity;
        record.unit_price = record.unit_price.map(|price| -price);
        record.total_value = record.total_value.map(|value| -value);
    }
    record
}

fn get_symbol(product: &str) -> GenericResult<String> {
    match product.trim().split(' ').next() {
        Some(symbol) if !symbol.is_empty() => Ok(symbol.to_owned()),
        _ => Err!("Invalid product name: {:?}", product),
    }
}

fn parse_optional_decimal(name: &str, value: Option<&str>) -> Option<Decimal> {
    let value = value?;

    match util::parse_localized_decimal(value) {
        Ok(value) => Some(value),
        Err(_) => {
            trace!("Treating {} {:?} as missing.", name, value);
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use super::*;

    fn transaction(direction: &str, unit_price: Option<&str>, total_value: Option<&str>) -> RawTransaction {
        RawTransaction {
            direction: direction.to_owned(),
            date: s!("24/03/2021"),
            description: s!("Transferência - Liquidação"),
            product: s!("BBAS3 - BANCO DO BRASIL S/A"),
            institution: Some(s!("NU INVEST CORRETORA DE VALORES S.A.")),
            quantity: s!("100"),
            unit_price: unit_price.map(ToOwned::to_owned),
            total_value: total_value.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn credit() {
        let records = normalize_all(&[transaction("Credito", Some("27,50"), Some("2.750,00"))]).unwrap();
        assert_eq!(records, vec![CanonicalRecord {
            symbol: s!("BBAS3"),
            date: date!(2021, 3, 24),
            event_type: EventType::Credit,
            description: Description::SettlementTransfer,
            quantity: dec!(100),
            unit_price: Some(dec!(27.5)),
            total_value: Some(dec!(2750)),
        }]);
    }

    #[test]
    fn debit() {
        let record = normalize_all(&[transaction("Debito", Some("27.5"), Some("2750"))]).unwrap().remove(0);
        assert_eq!(record.event_type, EventType::Debit);
        assert_eq!(record.quantity, dec!(-100));
        assert_eq!(record.unit_price, Some(dec!(-27.5)));
        assert_eq!(record.total_value, Some(dec!(-2750)));
    }

    #[rstest(unit_price, total_value,
        case(None, None),
        case(Some("-"), Some("-")),
        case(Some("n/a"), None),
    )]
    fn missing_prices(unit_price: Option<&str>, total_value: Option<&str>) {
        let record = normalize(&transaction("Credito", unit_price, total_value)).unwrap();
        assert_eq!(record.unit_price, None);
        assert_eq!(record.total_value, None);
    }

    #[test]
    fn unknown_description() {
        let mut raw = transaction("Credito", None, None);
        raw.description = s!("Cessão de Direitos");

        let record = normalize(&raw).unwrap();
        assert_eq!(record.description, Description::Other(s!("Cessão de Direitos")));
        assert_eq!(record.description.class(), None);
    }

    #[test]
    fn unknown_rows() {
        let mut unknown = transaction("Credito", Some("-"), Some("-"));
        unknown.description = s!("Cessão de Direitos");
        unknown.quantity = s!("-");
        unknown.date = s!("-");

        let records = normalize_all(&[
            unknown.clone(),
            transaction("Credito", Some("27,50"), Some("2.750,00")),
            unknown,
        ]).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, Description::SettlementTransfer);
        assert_eq!(records[0].quantity, dec!(100));
    }

    #[test]
    fn symbol() {
        assert_eq!(get_symbol("ITSA4 - ITAUSA S.A.").unwrap(), "ITSA4");
        assert_eq!(get_symbol("TESOURO").unwrap(), "TESOURO");
        assert!(get_symbol("  ").is_err());
    }

    #[test]
    fn invalid_rows() {
        let mut raw = transaction("Transferência", None, None);
        assert_eq!(
            normalize_all(&[raw.clone()]).unwrap_err().to_string(),
            r#"Invalid #1 transaction ("BBAS3 - BANCO DO BRASIL S/A"): Invalid movement direction: "Transferência""#);

        raw.direction = s!("Debito");
        raw.date = s!("2021-03-24");
        assert!(normalize(&raw).is_err());

        raw.date = s!("24/03/2021");
        raw.quantity = s!("-");
        assert_eq!(normalize(&raw).unwrap_err().to_string(), r#"Invalid quantity: "-""#);
    }
}
