use crate::models::{SelectedSeat, Venue};

/// Нормализация запроса: пробелы по краям не важны, регистр тоже.
fn prepare_search_query(query: &str) -> String {
    query.trim().to_ascii_uppercase()
}

/// Поиск места по id во всех секциях. Пустой запрос ничего не находит.
pub fn find_seat(venue: &Venue, query: &str) -> Option<SelectedSeat> {
    let search_id = prepare_search_query(query);
    if search_id.is_empty() {
        return None;
    }

    venue
        .seats()
        .find(|(_, _, seat)| seat.id.to_ascii_uppercase() == search_id)
        .map(|(section, row, seat)| SelectedSeat::new(section, row, seat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::venue::fixtures::{seat, venue};
    use crate::models::SeatStatus::*;

    fn sample() -> Venue {
        venue(vec![
            ("A", vec![vec![seat("A-1-01", 0.0, 0.0, Available)], vec![seat("A-2-05", 0.0, 25.0, Sold)]]),
            ("B", vec![vec![seat("b-1-01", 0.0, 200.0, Held)]]),
        ])
    }

    #[test]
    fn finds_seat_case_insensitively() {
        let found = find_seat(&sample(), "  a-1-01 ").unwrap();
        assert_eq!(found.id(), "A-1-01");
        assert_eq!(found.section_label, "Section A");
        assert_eq!(found.row_index, 1);

        let found = find_seat(&sample(), "A-2-05").unwrap();
        assert_eq!(found.row_index, 2);
        assert_eq!(found.seat.status, Sold);

        assert_eq!(find_seat(&sample(), "B-1-01").unwrap().section_id, "B");
    }

    #[test]
    fn unknown_or_empty_query_finds_nothing() {
        assert!(find_seat(&sample(), "Z-9-99").is_none());
        assert!(find_seat(&sample(), "   ").is_none());
    }
}
