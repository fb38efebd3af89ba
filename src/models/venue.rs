use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::seat::{Seat, SeatStatus};
use crate::error::VenueError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionTransform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for SectionTransform {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, scale: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub index: u32,
    pub seats: Vec<Seat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub transform: SectionTransform,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSize {
    pub width: f64,
    pub height: f64,
}

/// Снимок зала. Никогда не меняется на месте: любое изменение статуса
/// даёт новую структурную копию.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<MapSize>,
    pub sections: Vec<Section>,
}

impl Venue {
    /// Обход мест в порядке секция → ряд → место.
    pub fn seats(&self) -> impl Iterator<Item = (&Section, &Row, &Seat)> {
        self.sections.iter().flat_map(|section| {
            section
                .rows
                .iter()
                .flat_map(move |row| row.seats.iter().map(move |seat| (section, row, seat)))
        })
    }

    pub fn seat_count(&self) -> usize {
        self.seats().count()
    }

    pub fn contains_seat(&self, id: &str) -> bool {
        self.seats().any(|(_, _, seat)| seat.id == id)
    }

    /// Id места должен быть уникален во всём зале, иначе поиск неоднозначен.
    pub fn validate(&self) -> Result<(), VenueError> {
        let mut seen = HashSet::with_capacity(self.seat_count());
        for (_, _, seat) in self.seats() {
            if !seen.insert(seat.id.as_str()) {
                return Err(VenueError::DuplicateSeatId(seat.id.clone()));
            }
        }
        Ok(())
    }

    /// Копия зала с заменённым статусом одного места.
    /// `None`, если такого места нет.
    pub fn with_seat_status(&self, seat_id: &str, status: SeatStatus) -> Option<Venue> {
        if !self.contains_seat(seat_id) {
            return None;
        }

        let mut next = self.clone();
        for section in &mut next.sections {
            for row in &mut section.rows {
                for seat in &mut row.seats {
                    if seat.id == seat_id {
                        seat.status = status;
                    }
                }
            }
        }
        Some(next)
    }
}
