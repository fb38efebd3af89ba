use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SeatIdError, UnknownStatus};

/// Статус места. Меняется только целиком, через замену поля.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Held,
    Reserved,
    Sold,
}

impl SeatStatus {
    /// Выбирать можно только свободные и удерживаемые места.
    pub fn is_selectable(self) -> bool {
        matches!(self, SeatStatus::Available | SeatStatus::Held)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeatStatus::Available => "available",
            SeatStatus::Held => "held",
            SeatStatus::Reserved => "reserved",
            SeatStatus::Sold => "sold",
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(SeatStatus::Available),
            "held" => Ok(SeatStatus::Held),
            "reserved" => Ok(SeatStatus::Reserved),
            "sold" => Ok(SeatStatus::Sold),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: String,
    pub col: u32,
    pub x: f64,
    pub y: f64,
    pub price_tier: u8,
    pub status: SeatStatus,
}

// Цены по ценовым категориям, как в легенде карты
pub const DEFAULT_TIER_PRICE: u32 = 50;

pub fn tier_price(tier: u8) -> u32 {
    match tier {
        1 => 50,
        2 => 75,
        3 => 100,
        4 => 150,
        _ => DEFAULT_TIER_PRICE,
    }
}

impl Seat {
    pub fn price(&self) -> u32 {
        tier_price(self.price_tier)
    }
}

/// Разобранный идентификатор места.
///
/// Грамматика: `seat-id := segment "-" segment "-" segment ("-" segment)*`,
/// где `segment` означает любую (в том числе пустую) последовательность символов без `-`.
/// Первые три сегмента задают секцию, ряд и колонку, остальные игнорируются.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatIdParts<'a> {
    pub section: &'a str,
    pub row: &'a str,
    pub column: &'a str,
}

impl<'a> SeatIdParts<'a> {
    pub fn parse(id: &'a str) -> Result<Self, SeatIdError> {
        let mut parts = id.split('-');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(section), Some(row), Some(column)) => Ok(SeatIdParts { section, row, column }),
            _ => Err(SeatIdError::TooFewSegments(id.to_string())),
        }
    }

    /// Ключ ряда: `секция-ряд`, например `A-3`.
    pub fn row_key(&self) -> String {
        format!("{}-{}", self.section, self.row)
    }
}
