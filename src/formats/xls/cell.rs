use num_traits::cast::FromPrimitive;

use crate::core::GenericResult;
use crate::types::Decimal;

pub use calamine::Data as Cell;

/// Renders a cell to text the way the brokerage export would show it: numbers with a decimal
/// point and dates in DD/MM/YYYY format. Empty cells are returned as `None`.
pub fn get_text_cell(cell: &Cell) -> GenericResult<Option<String>> {
    Ok(match cell {
        Cell::Empty => None,
        Cell::String(value) | Cell::DateTimeIso(value) => {
            let value = value.trim();
            if value.is_empty() {
                None
            } else {
                Some(value.to_owned())
            }
        },
        Cell::Int(value) => Some(value.to_string()),
        Cell::Float(value) => Some(Decimal::from_f64(*value).ok_or_else(|| format!(
            "Got an invalid numeric cell value: {value}"))?.normalize().to_string()),
        Cell::DateTime(value) => {
            let date_time = value.as_datetime().ok_or_else(|| format!(
                "Got an invalid date cell value: {value:?}"))?;
            Some(date_time.date().format("%d/%m/%Y").to_string())
        },
        Cell::Error(_) => None,
        _ => return Err!("Got an unexpected cell value: {:?}", cell),
    })
}

pub trait CellType: Sized {
    fn parse(cell: &Cell) -> GenericResult<Self>;
}

impl CellType for String {
    fn parse(cell: &Cell) -> GenericResult<String> {
        get_text_cell(cell)?.ok_or_else(|| "Got an empty cell".into())
    }
}

impl CellType for Option<String> {
    fn parse(cell: &Cell) -> GenericResult<Option<String>> {
        get_text_cell(cell)
    }
}

pub fn parse_cell<T: CellType>(cell: Option<&Cell>) -> GenericResult<T> {
    match cell {
        Some(cell) => T::parse(cell),
        None => T::parse(&Cell::Empty),
    }
}
