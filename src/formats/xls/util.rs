use super::Cell;

pub fn is_empty_row(row: &[Cell]) -> bool {
    row.iter().all(|cell| match cell {
        Cell::Empty => true,
        Cell::String(value) => value.trim().is_empty(),
        _ => false,
    })
}
