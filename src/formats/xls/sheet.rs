use std::ops::Index;

use calamine::{Range, Reader, open_workbook_auto};
use log::trace;

use crate::core::GenericResult;

use super::Cell;

pub struct SheetReader {
    sheet: Range<Cell>,
    next_row_id: usize,
}

impl SheetReader {
    pub fn new(sheet: Range<Cell>) -> SheetReader {
        SheetReader {sheet, next_row_id: 0}
    }

    pub fn open(path: &str, parser: &dyn SheetParser) -> GenericResult<SheetReader> {
        let sheet = open_sheet(path, parser.sheet_name())?;
        Ok(SheetReader::new(sheet))
    }

    pub fn current_human_row_id(&self) -> usize {
        self.next_row_id
    }

    pub fn next_row(&mut self) -> Option<&[Cell]> {
        if self.next_row_id >= self.sheet.height() {
            return None;
        }

        let row = self.sheet.index(self.next_row_id);
        self.next_row_id += 1;
        Some(row)
    }

    pub fn next_row_checked(&mut self) -> GenericResult<&[Cell]> {
        Ok(self.next_row().ok_or("Got an unexpected end of sheet")?)
    }

    pub fn detalize_error(&self, error: &str) -> String {
        if self.next_row_id == 0 || self.next_row_id > self.sheet.height() {
            error.to_owned()
        } else {
            format!("At #{} row: {:?}: {}",
                    self.current_human_row_id(), self.sheet.index(self.next_row_id - 1), error)
        }
    }
}

pub trait SheetParser {
    /// Preferred sheet name. The first sheet of the workbook is used when it's not found.
    fn sheet_name(&self) -> Option<&str> {
        None
    }
}

pub fn open_sheet(path: &str, name: Option<&str>) -> GenericResult<Range<Cell>> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names();

    let sheet_name = name
        .and_then(|name| sheet_names.iter().find(|sheet_name| sheet_name.as_str() == name))
        .or_else(|| sheet_names.first())
        .cloned()
        .ok_or("The workbook has no sheets")?;

    trace!("Reading {:?} sheet from {:?}...", sheet_name, path);
    Ok(workbook.worksheet_range(&sheet_name)?)
}
