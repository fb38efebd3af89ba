use serde::{Deserialize, Serialize};

use super::seat::SeatStatus;
use crate::error::RelayError;

/// Сообщение ретранслятора: `{"seatId": "...", "status": "..."}`.
/// Статус хранится строкой, ретранслятор его не проверяет.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayMessage {
    pub seat_id: String,
    pub status: String,
}

impl RelayMessage {
    pub fn new(seat_id: impl Into<String>, status: SeatStatus) -> Self {
        Self {
            seat_id: seat_id.into(),
            status: status.as_str().to_string(),
        }
    }

    /// Разбор входящего кадра. Оба поля обязаны быть непустыми строками.
    pub fn parse(text: &str) -> Result<Self, RelayError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let seat_id = value
            .get("seatId")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or(RelayError::MissingField("seatId"))?;
        let status = value
            .get("status")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or(RelayError::MissingField("status"))?;

        Ok(Self {
            seat_id: seat_id.to_string(),
            status: status.to_string(),
        })
    }

    pub fn seat_status(&self) -> Result<SeatStatus, RelayError> {
        Ok(self.status.parse()?)
    }

    pub fn to_json(&self) -> String {
        serde_json::json!({ "seatId": self.seat_id, "status": self.status }).to_string()
    }
}
