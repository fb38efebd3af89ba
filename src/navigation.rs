//! Навигация по карте стрелками.
//!
//! От текущего места выбирается ближайшее доступное место по основной оси
//! направления. Поперечная ось влияет только на допуск, но не на ранжирование.

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownDirection;
use crate::spatial::{IndexedSeat, SpatialIndex};

/// Допуск выравнивания по поперечной оси.
pub const ALIGNMENT_TOLERANCE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Расстояние по основной оси, если `(x, y)` лежит строго в этом направлении от `from`.
    fn primary_distance(self, from: (f64, f64), to: (f64, f64)) -> Option<f64> {
        let (fx, fy) = from;
        let (tx, ty) = to;
        let (ahead, distance, offset) = match self {
            Direction::Up => (ty < fy, fy - ty, tx - fx),
            Direction::Down => (ty > fy, ty - fy, tx - fx),
            Direction::Left => (tx < fx, fx - tx, ty - fy),
            Direction::Right => (tx > fx, tx - fx, ty - fy),
        };
        (ahead && offset.abs() < ALIGNMENT_TOLERANCE).then_some(distance)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

// Принимает и имена клавиш ("ArrowUp"), и короткие имена ("up", "u")
impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" | "arrowup" => Ok(Direction::Up),
            "down" | "d" | "arrowdown" => Ok(Direction::Down),
            "left" | "l" | "arrowleft" => Ok(Direction::Left),
            "right" | "r" | "arrowright" => Ok(Direction::Right),
            _ => Err(UnknownDirection(s.to_string())),
        }
    }
}

/// Следующее место для фокуса. `None` означает, что фокус не меняется.
///
/// Без фокуса возвращается первое доступное место в порядке обхода, направление
/// игнорируется. Из кандидатов побеждает минимальное расстояние по основной оси;
/// при равенстве остаётся найденный раньше.
pub fn navigate<'a>(
    index: &'a SpatialIndex,
    focused: Option<&str>,
    direction: Direction,
) -> Option<&'a IndexedSeat> {
    let Some(focused) = focused else {
        return index.seats().iter().find(|s| s.is_selectable());
    };

    let current = index.get(focused)?;
    let origin = (current.x, current.y);

    let mut best: Option<(&IndexedSeat, f64)> = None;
    for candidate in index.seats() {
        if !candidate.is_selectable() || candidate.id() == focused {
            continue;
        }
        let Some(distance) = direction.primary_distance(origin, (candidate.x, candidate.y)) else {
            continue;
        };
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }

    best.map(|(seat, _)| seat)
}
