use std::fmt;
use std::str::FromStr;

use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::core::GenericResult;
use crate::formatting::format_date;
use crate::types::{Date, Decimal};

/// Direction of the movement as reported by the export's "Entrada/Saída" column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString)]
pub enum EventType {
    #[strum(serialize = "Credito", serialize = "Crédito")]
    Credit,
    #[strum(serialize = "Debito", serialize = "Débito")]
    Debit,
}

impl EventType {
    pub fn parse(value: &str) -> GenericResult<EventType> {
        Ok(EventType::from_str(value.trim()).map_err(|_| format!(
            "Invalid movement direction: {:?}", value))?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
pub enum Description {
    #[strum(serialize = "Atualização")]
    Update,
    #[strum(serialize = "Transferência - Liquidação")]
    SettlementTransfer,
    #[strum(serialize = "Bonificação em Ativos")]
    BonusGrant,
    #[strum(serialize = "Fração em Ativos")]
    FractionalSettlement,

    #[strum(serialize = "Rendimento")]
    Yield,
    #[strum(serialize = "Juros Sobre Capital Próprio")]
    InterestOnCapital,
    #[strum(serialize = "Dividendo")]
    Dividend,

    #[strum(disabled)]
    Other(String),
}

/// Stream a record belongs to after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    Position,
    Income(IncomeCategory),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, IntoStaticStr)]
pub enum IncomeCategory {
    #[strum(serialize = "Dividendo")]
    Dividend,
    #[strum(serialize = "Juros Sobre Capital Próprio")]
    InterestOnCapital,
    #[strum(serialize = "Rendimento")]
    Yield,
}

impl Description {
    pub fn parse(value: &str) -> Description {
        let value = value.trim();
        Description::from_str(value).unwrap_or_else(|_| Description::Other(value.to_owned()))
    }

    pub fn class(&self) -> Option<EventClass> {
        Some(match self {
            Description::Update |
            Description::SettlementTransfer |
            Description::BonusGrant |
            Description::FractionalSettlement => EventClass::Position,

            Description::Yield => EventClass::Income(IncomeCategory::Yield),
            Description::InterestOnCapital => EventClass::Income(IncomeCategory::InterestOnCapital),
            Description::Dividend => EventClass::Income(IncomeCategory::Dividend),

            Description::Other(_) => return None,
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Description::Other(name) => name,
            known => known.into(),
        }
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl IncomeCategory {
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// A single normalized transaction line.
///
/// `quantity`, `unit_price` and `total_value` are signed after sign adjustment: debits carry
/// negative values.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    pub symbol: String,
    pub date: Date,
    pub event_type: EventType,
    pub description: Description,
    pub quantity: Decimal,
    pub unit_price: Option<Decimal>,
    pub total_value: Option<Decimal>,
}

impl CanonicalRecord {
    pub fn brief(&self) -> String {
        format!("{} {} from {}", self.symbol, self.description, format_date(self.date))
    }
}
