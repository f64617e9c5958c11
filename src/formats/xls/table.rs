use std::borrow::Cow;

use itertools::Itertools;
use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::core::GenericResult;

use super::{SheetReader, Cell, is_empty_row};

pub trait TableRow: Sized {
    fn columns() -> Vec<TableColumn>;
    fn parse(row: &[Option<&Cell>]) -> GenericResult<Self>;
}

/// Reads a table which starts with a title row and ends at the end of the sheet. Empty rows are
/// skipped.
pub fn read_table<T: TableRow>(sheet: &mut SheetReader) -> GenericResult<Vec<T>> {
    let mut table = Vec::new();
    let columns = T::columns();

    let columns_mapping = loop {
        let row = sheet.next_row_checked()?;
        if !is_empty_row(row) {
            break map_columns(row, &columns)?;
        }
    };

    trace!("Reading {} table...", std::any::type_name::<T>());

    while let Some(row) = sheet.next_row() {
        if is_empty_row(row) {
            continue;
        }

        let mapped_row = columns_mapping.map(row)?;
        table.push(TableRow::parse(&mapped_row)?);
    }

    Ok(table)
}

pub struct TableColumn {
    name: &'static str,
    aliases: &'static [&'static str],
    optional: bool,
}

impl TableColumn {
    pub fn new(name: &'static str) -> TableColumn {
        TableColumn {name, aliases: &[], optional: false}
    }

    pub fn aliases(mut self, aliases: &'static [&'static str]) -> TableColumn {
        self.aliases = aliases;
        self
    }

    pub fn optional(mut self) -> TableColumn {
        self.optional = true;
        self
    }

    fn find(&self, row: &[Cell]) -> GenericResult<Option<usize>> {
        for (cell_id, cell) in row.iter().enumerate() {
            match cell {
                Cell::String(value) => {
                    return if self.matches(value) {
                        Ok(Some(cell_id))
                    } else if self.optional {
                        Ok(None)
                    } else {
                        Err!("Unable to find {:?} column - got {:?} instead", self.name, value)
                    };
                },
                Cell::Empty => {}
                _ => return Err!(
                    "Unable to find {:?} column - got an unexpected {:?} cell", self.name, cell),
            };
        }

        if self.optional {
            Ok(None)
        } else {
            Err!("The table has no {:?} column", self.name)
        }
    }

    fn matches(&self, value: &str) -> bool {
        let value = normalize_title(value);
        std::iter::once(&self.name).chain(self.aliases).any(|name| {
            normalize_title(name) == value
        })
    }
}

fn normalize_title(title: &str) -> Cow<'_, str> {
    lazy_static! {
        static ref SPACES_REGEX: Regex = Regex::new(r"\s+").unwrap();
    }
    SPACES_REGEX.replace_all(title.trim(), " ")
}

pub struct ColumnsMapping {
    mapping: Vec<Option<usize>>,
}

impl ColumnsMapping {
    pub fn map<'a>(&self, row: &'a [Cell]) -> GenericResult<Vec<Option<&'a Cell>>> {
        let mut mapped_row = Vec::with_capacity(self.mapping.len());
        let mut current_cell_id = 0;

        for &cell_id in &self.mapping {
            let Some(cell_id) = cell_id else {
                mapped_row.push(None);
                continue;
            };

            // Trailing empty cells may be omitted by the sheet
            if cell_id >= row.len() {
                mapped_row.push(None);
                continue;
            }

            let spare_cells = &row[current_cell_id..cell_id];
            if !is_empty_row(spare_cells) {
                return Err!(
                    "The row contains non-empty cells between column cells: {:?}", spare_cells);
            }

            mapped_row.push(Some(&row[cell_id]));
            current_cell_id = cell_id + 1;
        }

        let spare_cells = &row[current_cell_id.min(row.len())..];
        if !is_empty_row(spare_cells) {
            return Err!("The row contains non-empty cells after column cells: {:?}", spare_cells);
        }

        Ok(mapped_row)
    }
}

pub fn map_columns(mut row: &[Cell], columns: &[TableColumn]) -> GenericResult<ColumnsMapping> {
    let mut mapping = Vec::with_capacity(columns.len());
    let mut offset = 0;

    for column in columns {
        let cell_id = match column.find(row)? {
            Some(index) => {
                row = &row[index + 1..];
                let cell_id = offset + index;
                offset += index + 1;
                Some(cell_id)
            }
            None => None,
        };
        mapping.push(cell_id);
    }

    if !is_empty_row(row) {
        return Err!(
            "The table has more columns than expected: {}",
            row.iter().filter_map(|cell| {
                match cell {
                    Cell::Empty => None,
                    _ => Some(cell.to_string()),
                }
            }).format(", "))
    }

    Ok(ColumnsMapping { mapping })
}
