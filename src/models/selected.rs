use serde::{Deserialize, Serialize};

use super::seat::Seat;
use super::venue::{Row, Section};

/// Место вместе с денормализованными данными секции и ряда на момент поиска.
/// Живёт отдельно от зала, чтобы панель деталей не обходила дерево заново.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedSeat {
    #[serde(flatten)]
    pub seat: Seat,
    pub section_id: String,
    pub section_label: String,
    pub row_index: u32,
}

impl SelectedSeat {
    pub fn new(section: &Section, row: &Row, seat: &Seat) -> Self {
        Self {
            seat: seat.clone(),
            section_id: section.id.clone(),
            section_label: section.label.clone(),
            row_index: row.index,
        }
    }

    pub fn id(&self) -> &str {
        &self.seat.id
    }
}
