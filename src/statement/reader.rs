use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::core::GenericResult;
use crate::formats::xls::{self, SheetReader};

use super::raw::{RawTransaction, TransactionsSheetParser};

/// Reads all spreadsheet exports from the directory. Files are processed in name order, rows keep
/// their order inside each file.
pub fn read_transactions(statement_dir_path: &str) -> GenericResult<Vec<RawTransaction>> {
    let mut file_names = get_statement_files(statement_dir_path).map_err(|e| format!(
        "Error while reading {:?}: {}", statement_dir_path, e))?;

    if file_names.is_empty() {
        return Err!("{:?} doesn't contain any transaction export", statement_dir_path);
    }
    file_names.sort_unstable();

    let mut transactions = Vec::new();

    for file_name in &file_names {
        let path = Path::new(statement_dir_path).join(file_name);
        let path = path.to_str().ok_or_else(|| format!(
            "Got an invalid path: {:?}", path.to_string_lossy()))?;

        let mut file_transactions = read_file(path).map_err(|e| format!(
            "Error while reading {:?}: {}", path, e))?;

        debug!("Got {} transactions from {:?}.", file_transactions.len(), path);
        transactions.append(&mut file_transactions);
    }

    info!("Read {} transactions from {} files.", transactions.len(), file_names.len());
    Ok(transactions)
}

fn read_file(path: &str) -> GenericResult<Vec<RawTransaction>> {
    let mut sheet = SheetReader::open(path, &TransactionsSheetParser {})?;
    xls::read_table(&mut sheet).map_err(|e| sheet.detalize_error(&e.to_string()).into())
}

fn is_statement(file_name: &str) -> bool {
    let file_name = file_name.to_lowercase();
    !file_name.starts_with("~$") && (file_name.ends_with(".xlsx") || file_name.ends_with(".xls"))
}

fn get_statement_files(statement_dir_path: &str) -> GenericResult<Vec<String>> {
    let mut file_names = Vec::new();

    for entry in fs::read_dir(statement_dir_path)? {
        let entry = entry?;

        let file_name = entry.file_name().into_string().map_err(|file_name| format!(
            "Got an invalid file name: {:?}", file_name.to_string_lossy()))?;

        if !entry.file_type()?.is_file() || !is_statement(&file_name) {
            continue;
        }

        file_names.push(file_name);
    }

    Ok(file_names)
}
