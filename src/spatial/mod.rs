//! Пространственный индекс карты мест.
//!
//! Переводит вложенные списки зала в плоский список мест с нормализованными
//! координатами (минимум по каждой оси сдвигается к фиксированному отступу)
//! и строит подписи рядов и колонок для разметки карты.

mod labels;

use std::collections::HashMap;

use crate::models::{SelectedSeat, Venue};

pub use labels::{compare_labels, ColumnLabel, RowLabel, LABEL_TOLERANCE};

/// Радиус места в единицах карты.
pub const SEAT_RADIUS: f64 = 4.0;
/// Отступ от края до ближайшего места.
pub const EDGE_PADDING: f64 = SEAT_RADIUS + 5.0;
/// Место под подписи рядов и колонок.
pub const LABEL_PADDING: f64 = 20.0;
/// Итоговый сдвиг: минимальная координата места после нормализации.
pub const MAP_MARGIN: f64 = EDGE_PADDING + LABEL_PADDING;

#[derive(Debug, Clone, PartialEq)]
pub struct IndexedSeat {
    pub seat: SelectedSeat,
    pub x: f64,
    pub y: f64,
}

impl IndexedSeat {
    pub fn id(&self) -> &str {
        self.seat.id()
    }

    pub fn is_selectable(&self) -> bool {
        self.seat.seat.status.is_selectable()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MapBounds {
    pub width: f64,
    pub height: f64,
    /// Вычитается из исходных координат: `normalized = raw - offset`.
    pub offset_x: f64,
    pub offset_y: f64,
    pub label_padding: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    seats: Vec<IndexedSeat>,
    positions: HashMap<String, usize>,
    bounds: MapBounds,
    column_labels: Vec<ColumnLabel>,
    row_labels: Vec<RowLabel>,
}

impl SpatialIndex {
    pub fn build(venue: &Venue) -> Self {
        let bounds = compute_bounds(venue);

        let mut seats = Vec::with_capacity(venue.seat_count());
        let mut positions = HashMap::with_capacity(seats.capacity());
        for (section, row, seat) in venue.seats() {
            positions.entry(seat.id.clone()).or_insert(seats.len());
            seats.push(IndexedSeat {
                seat: SelectedSeat::new(section, row, seat),
                x: seat.x - bounds.offset_x,
                y: seat.y - bounds.offset_y,
            });
        }

        let (column_labels, row_labels) = labels::collect(&seats, bounds.label_padding);

        Self {
            seats,
            positions,
            bounds,
            column_labels,
            row_labels,
        }
    }

    /// Места в порядке обхода зала.
    pub fn seats(&self) -> &[IndexedSeat] {
        &self.seats
    }

    pub fn get(&self, id: &str) -> Option<&IndexedSeat> {
        self.position_of(id).map(|i| &self.seats[i])
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn bounds(&self) -> MapBounds {
        self.bounds
    }

    pub fn column_labels(&self) -> &[ColumnLabel] {
        &self.column_labels
    }

    pub fn row_labels(&self) -> &[RowLabel] {
        &self.row_labels
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}

fn compute_bounds(venue: &Venue) -> MapBounds {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for (_, _, seat) in venue.seats() {
        min_x = min_x.min(seat.x);
        min_y = min_y.min(seat.y);
        max_x = max_x.max(seat.x);
        max_y = max_y.max(seat.y);
    }

    // Пустой зал: рисовать нечего
    if !min_x.is_finite() {
        return MapBounds {
            label_padding: LABEL_PADDING,
            ..MapBounds::default()
        };
    }

    MapBounds {
        width: max_x - min_x + EDGE_PADDING * 2.0 + LABEL_PADDING,
        height: max_y - min_y + EDGE_PADDING * 2.0 + LABEL_PADDING,
        offset_x: min_x - MAP_MARGIN,
        offset_y: min_y - MAP_MARGIN,
        label_padding: LABEL_PADDING,
    }
}
