use crate::core::GenericResult;
use crate::formats::xls::{self, Cell, SheetParser, TableColumn, TableRow};

/// A transaction line exactly as it appears in the export, with every cell rendered to text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTransaction {
    pub direction: String,
    pub date: String,
    pub description: String,
    pub product: String,
    pub institution: Option<String>,
    pub quantity: String,
    pub unit_price: Option<String>,
    pub total_value: Option<String>,
}

impl TableRow for RawTransaction {
    fn columns() -> Vec<TableColumn> {
        vec![
            TableColumn::new("Entrada/Saída").aliases(&["Entrada/Saida"]),
            TableColumn::new("Data"),
            TableColumn::new("Movimentação").aliases(&["Movimentacao"]),
            TableColumn::new("Produto"),
            TableColumn::new("Instituição").aliases(&["Instituicao"]).optional(),
            TableColumn::new("Quantidade"),
            TableColumn::new("Preço unitário").aliases(&["Preco unitario"]),
            TableColumn::new("Valor da Operação").aliases(&["Valor da Operacao"]),
        ]
    }

    fn parse(row: &[Option<&Cell>]) -> GenericResult<RawTransaction> {
        Ok(RawTransaction {
            direction: xls::parse_cell(row[0])?,
            date: xls::parse_cell(row[1])?,
            description: xls::parse_cell(row[2])?,
            product: xls::parse_cell(row[3])?,
            institution: xls::parse_cell(row[4])?,
            quantity: xls::parse_cell(row[5])?,
            unit_price: xls::parse_cell(row[6])?,
            total_value: xls::parse_cell(row[7])?,
        })
    }
}

pub struct TransactionsSheetParser {}

impl SheetParser for TransactionsSheetParser {
    fn sheet_name(&self) -> Option<&str> {
        Some("Movimentação")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn parse_row() {
        let header: Vec<Cell> = [
            "Entrada/Saída", "Data", "Movimentação", "Produto", "Instituição",
            "Quantidade", "Preço unitário", "Valor da Operação",
        ].iter().map(|title| Cell::String(title.to_string())).collect();

        let mapping = xls::map_columns(&header, &RawTransaction::columns()).unwrap();

        let row = vec![
            Cell::String(s!("Credito")),
            Cell::String(s!("15/03/2021")),
            Cell::String(s!("Transferência - Liquidação")),
            Cell::String(s!("ITSA4 - ITAUSA S.A.")),
            Cell::String(s!("XP INVESTIMENTOS CCTVM S/A")),
            Cell::Int(100),
            Cell::Float(10.5),
            Cell::String(s!("-")),
        ];

        let transaction = RawTransaction::parse(&mapping.map(&row).unwrap()).unwrap();
        assert_eq!(transaction, RawTransaction {
            direction: s!("Credito"),
            date: s!("15/03/2021"),
            description: s!("Transferência - Liquidação"),
            product: s!("ITSA4 - ITAUSA S.A."),
            institution: Some(s!("XP INVESTIMENTOS CCTVM S/A")),
            quantity: s!("100"),
            unit_price: Some(s!("10.5")),
            total_value: Some(s!("-")),
        });
    }
}
