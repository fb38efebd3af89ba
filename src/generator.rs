//! Генерация большого тестового зала.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{MapSize, Row, Seat, SeatStatus, Section, SectionTransform, Venue};

pub const GENERATED_VENUE_FILE: &str = "venue-generated.json";

// Распределение статусов и цен: больше свободных мест и дешёвых категорий
const STATUSES: [SeatStatus; 7] = [
    SeatStatus::Available,
    SeatStatus::Available,
    SeatStatus::Available,
    SeatStatus::Available,
    SeatStatus::Held,
    SeatStatus::Reserved,
    SeatStatus::Sold,
];
const PRICE_TIERS: [u8; 7] = [1, 1, 1, 2, 2, 3, 4];

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub target_seats: usize,
    pub sections: Vec<String>,
    pub rows_per_section: u32,
    pub spacing_x: f64,
    pub spacing_y: f64,
    pub start_x: f64,
    pub start_y: f64,
    /// Зазор между секциями по вертикали.
    pub section_gap: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            target_seats: 15_000,
            sections: ["A", "B", "C", "D", "E", "F", "G", "H"].iter().map(|s| s.to_string()).collect(),
            rows_per_section: 50,
            spacing_x: 30.0,
            spacing_y: 25.0,
            start_x: 30.0,
            start_y: 30.0,
            section_gap: 100.0,
        }
    }
}

impl GeneratorConfig {
    pub fn seats_per_row(&self) -> u32 {
        let slots = self.sections.len() * self.rows_per_section as usize;
        if slots == 0 {
            return 0;
        }
        self.target_seats.div_ceil(slots) as u32
    }
}

pub fn generate_venue<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Venue {
    let seats_per_row = config.seats_per_row();
    let section_height = config.rows_per_section as f64 * config.spacing_y + config.section_gap;
    let mut total = 0usize;
    let mut sections = Vec::new();

    'sections: for (section_index, section_id) in config.sections.iter().enumerate() {
        let mut rows = Vec::new();

        for row_index in 1..=config.rows_per_section {
            // Два последних ряда короче
            let row_len = if row_index + 2 <= config.rows_per_section {
                seats_per_row
            } else {
                (seats_per_row as f64 * 0.8).floor() as u32
            };

            let mut seats = Vec::new();
            for col in 1..=row_len {
                if total >= config.target_seats {
                    break;
                }
                seats.push(Seat {
                    id: format!("{}-{}-{:02}", section_id, row_index, col),
                    col,
                    x: config.start_x + (col - 1) as f64 * config.spacing_x,
                    y: config.start_y
                        + (row_index - 1) as f64 * config.spacing_y
                        + section_index as f64 * section_height,
                    price_tier: *PRICE_TIERS.choose(rng).unwrap_or(&1),
                    status: *STATUSES.choose(rng).unwrap_or(&SeatStatus::Available),
                });
                total += 1;
            }

            if !seats.is_empty() {
                rows.push(Row { index: row_index, seats });
            }
            if total >= config.target_seats {
                push_section(&mut sections, section_id, rows);
                break 'sections;
            }
        }

        push_section(&mut sections, section_id, rows);
    }

    let (max_x, max_y) = sections
        .iter()
        .flat_map(|s: &Section| s.rows.iter())
        .flat_map(|r| r.seats.iter())
        .fold((0.0f64, 0.0f64), |(mx, my), seat| (mx.max(seat.x), my.max(seat.y)));

    Venue {
        venue_id: Some("arena-01-large".to_string()),
        name: Some("Metropolis Arena (Large)".to_string()),
        map: Some(MapSize {
            width: max_x + 50.0,
            height: max_y + 50.0,
        }),
        sections,
    }
}

fn push_section(sections: &mut Vec<Section>, id: &str, rows: Vec<Row>) {
    if rows.is_empty() {
        return;
    }
    sections.push(Section {
        id: id.to_string(),
        label: format!("Section {}", id),
        transform: SectionTransform::default(),
        rows,
    });
}
