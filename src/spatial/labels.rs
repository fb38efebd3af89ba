use std::cmp::Ordering;
use std::collections::HashMap;

use super::IndexedSeat;
use crate::models::SeatIdParts;

/// Места ближе этого расстояния считаются одной колонкой (рядом).
pub const LABEL_TOLERANCE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLabel {
    pub label: String,
    pub x: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowLabel {
    pub label: String,
    pub y: f64,
}

/// Подписи в порядке первого появления ключа.
struct LabelMap {
    order: Vec<(String, f64)>,
    slots: HashMap<String, usize>,
}

impl LabelMap {
    fn new() -> Self {
        Self { order: Vec::new(), slots: HashMap::new() }
    }

    // Координата меняется, только если новое место в пределах допуска от текущей
    fn observe(&mut self, key: &str, coord: f64) {
        match self.slots.get(key) {
            Some(&slot) => {
                let current = &mut self.order[slot].1;
                if (*current - coord).abs() < LABEL_TOLERANCE {
                    *current = coord;
                }
            }
            None => {
                self.slots.insert(key.to_string(), self.order.len());
                self.order.push((key.to_string(), coord));
            }
        }
    }

    fn into_sorted(self, padding: f64) -> Vec<(String, f64)> {
        let mut labels: Vec<(String, f64)> = self
            .order
            .into_iter()
            .map(|(label, coord)| (label, coord + padding))
            .collect();
        insertion_sort_by(&mut labels, |a, b| compare_labels(&a.0, &b.0));
        labels
    }
}

pub(super) fn collect(seats: &[IndexedSeat], padding: f64) -> (Vec<ColumnLabel>, Vec<RowLabel>) {
    let mut columns = LabelMap::new();
    let mut rows = LabelMap::new();

    for indexed in seats {
        let Ok(parts) = SeatIdParts::parse(indexed.id()) else {
            continue;
        };
        columns.observe(parts.column, indexed.x);
        rows.observe(&parts.row_key(), indexed.y);
    }

    let columns = columns
        .into_sorted(padding)
        .into_iter()
        .map(|(label, x)| ColumnLabel { label, x })
        .collect();
    let rows = rows
        .into_sorted(padding)
        .into_iter()
        .map(|(label, y)| RowLabel { label, y })
        .collect();

    (columns, rows)
}

/// Числовое сравнение, если обе подписи являются целыми числами, иначе лексикографическое.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

// compare_labels не задаёт полного порядка на смешанных подписях ("2", "10", "1a"),
// а slice::sort_by в таком случае может паниковать.
fn insertion_sort_by<T>(items: &mut [T], mut cmp: impl FnMut(&T, &T) -> Ordering) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && cmp(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::venue::fixtures::{seat, venue};
    use crate::models::SeatStatus::Available;
    use crate::spatial::{SpatialIndex, LABEL_PADDING, MAP_MARGIN};

    #[test]
    fn numeric_labels_sort_numerically() {
        assert_eq!(compare_labels("2", "10"), Ordering::Less);
        assert_eq!(compare_labels("09", "10"), Ordering::Less);
        assert_eq!(compare_labels("A-10", "A-2"), Ordering::Less);
        assert_eq!(compare_labels("B", "A"), Ordering::Greater);
    }

    #[test]
    fn mixed_labels_do_not_panic() {
        let mut labels = vec!["2", "10", "1a", "b", "3"];
        insertion_sort_by(&mut labels, |a, b| compare_labels(a, b));
        assert_eq!(labels.len(), 5);
    }

    #[test]
    fn columns_are_deduplicated_and_sorted() {
        let venue = venue(vec![(
            "A",
            vec![
                vec![
                    seat("A-1-10", 300.0, 0.0, Available),
                    seat("A-1-02", 60.0, 0.0, Available),
                    seat("A-1-01", 30.0, 0.0, Available),
                ],
                vec![
                    seat("A-2-10", 300.0, 25.0, Available),
                    seat("A-2-02", 62.0, 25.0, Available),
                ],
            ],
        )]);
        let index = SpatialIndex::build(&venue);

        let columns: Vec<(&str, f64)> = index
            .column_labels()
            .iter()
            .map(|c| (c.label.as_str(), c.x))
            .collect();
        // "02" во втором ряду сдвинуто на 2 < допуска, берётся новая координата
        assert_eq!(
            columns,
            vec![
                ("01", MAP_MARGIN + LABEL_PADDING),
                ("02", 32.0 + MAP_MARGIN + LABEL_PADDING),
                ("10", 270.0 + MAP_MARGIN + LABEL_PADDING),
            ]
        );
    }

    #[test]
    fn far_away_column_keeps_first_coordinate() {
        let venue = venue(vec![
            ("A", vec![vec![seat("A-1-01", 0.0, 0.0, Available)]]),
            ("B", vec![vec![seat("B-1-01", 500.0, 100.0, Available)]]),
        ]);
        let index = SpatialIndex::build(&venue);
        assert_eq!(index.column_labels().len(), 1);
        assert_eq!(index.column_labels()[0].x, MAP_MARGIN + LABEL_PADDING);

        let rows: Vec<&str> = index.row_labels().iter().map(|r| r.label.as_str()).collect();
        assert_eq!(rows, vec!["A-1", "B-1"]);
    }
}
