//! Геометрия окна просмотра: отсечение невидимых мест, прокрутка к фокусу,
//! жесты масштабирования и панорамирования.

use crate::spatial::{IndexedSeat, SpatialIndex};

/// Во сколько раз карта крупнее единиц зала при отрисовке.
pub const MAP_SCALE: f64 = 5.0;
/// Запас вокруг окна, чтобы места появлялись до того, как в него попадут.
pub const CULL_PADDING: f64 = 50.0;
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;

/// Окно просмотра в единицах карты (не в пикселях).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Из прокрутки и размера контейнера в пикселях.
    pub fn from_scroll(scroll_left: f64, scroll_top: f64, client_width: f64, client_height: f64) -> Self {
        Self {
            x: scroll_left / MAP_SCALE,
            y: scroll_top / MAP_SCALE,
            width: client_width / MAP_SCALE,
            height: client_height / MAP_SCALE,
        }
    }

    pub fn contains(&self, x: f64, y: f64, padding: f64) -> bool {
        x >= self.x - padding
            && x <= self.x + self.width + padding
            && y >= self.y - padding
            && y <= self.y + self.height + padding
    }
}

pub fn visible_seats<'a>(index: &'a SpatialIndex, viewport: &Viewport) -> impl Iterator<Item = &'a IndexedSeat> + 'a {
    let viewport = *viewport;
    index
        .seats()
        .iter()
        .filter(move |s| viewport.contains(s.x, s.y, CULL_PADDING))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTarget {
    pub left: f64,
    pub top: f64,
}

/// Прокрутка, при которой точка карты оказывается в центре контейнера.
pub fn center_on(x: f64, y: f64, client_width: f64, client_height: f64) -> ScrollTarget {
    ScrollTarget {
        left: (x * MAP_SCALE - client_width / 2.0).max(0.0),
        top: (y * MAP_SCALE - client_height / 2.0).max(0.0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn distance(self, other: Point) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }

    fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Pan { start: Point },
    Pinch { start_distance: f64 },
}

/// Состояние касаний: одним пальцем сдвиг, двумя масштаб вокруг центра.
/// Координаты касаний относительно контейнера.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchGesture {
    pub zoom: f64,
    pub pan: Point,
    gesture: Gesture,
    initial_zoom: f64,
    initial_pan: Point,
}

impl Default for PinchGesture {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::new(0.0, 0.0),
            gesture: Gesture::Idle,
            initial_zoom: 1.0,
            initial_pan: Point::new(0.0, 0.0),
        }
    }
}

impl PinchGesture {
    pub fn touch_start(&mut self, touches: &[Point]) {
        self.initial_zoom = self.zoom;
        self.initial_pan = self.pan;
        self.gesture = match touches {
            [one] => Gesture::Pan { start: *one },
            [a, b, ..] => Gesture::Pinch { start_distance: a.distance(*b) },
            [] => Gesture::Idle,
        };
    }

    pub fn touch_move(&mut self, touches: &[Point]) {
        match (self.gesture, touches) {
            (Gesture::Pinch { start_distance }, [a, b, ..]) if start_distance > 0.0 => {
                let scale_change = a.distance(*b) / start_distance;
                let zoom = (self.initial_zoom * scale_change).clamp(MIN_ZOOM, MAX_ZOOM);
                let center = a.midpoint(*b);
                let ratio = zoom / self.initial_zoom;
                self.zoom = zoom;
                self.pan = Point::new(
                    center.x - (center.x - self.initial_pan.x) * ratio,
                    center.y - (center.y - self.initial_pan.y) * ratio,
                );
            }
            (Gesture::Pan { start }, [one]) => {
                self.pan = Point::new(
                    self.initial_pan.x + one.x - start.x,
                    self.initial_pan.y + one.y - start.y,
                );
            }
            _ => {}
        }
    }

    pub fn touch_end(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Пока карта сдвинута или масштабирована, нативная прокрутка отключена.
    pub fn is_transformed(&self) -> bool {
        self.zoom != 1.0 || self.pan.x != 0.0 || self.pan.y != 0.0
    }
}
