use crate::models::SelectedSeat;

/// Сколько мест можно выбрать одновременно.
pub const MAX_SELECTED_SEATS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Место добавлено. Единственный исход, о котором сообщается ретранслятору.
    Added,
    Removed,
    AlreadySelected,
    NotSelectable,
    Full,
}

impl SelectOutcome {
    pub fn changed(self) -> bool {
        matches!(self, SelectOutcome::Added | SelectOutcome::Removed)
    }
}

#[derive(Debug, Clone)]
pub struct SelectionSet {
    seats: Vec<SelectedSeat>,
    capacity: usize,
}

impl Default for SelectionSet {
    fn default() -> Self {
        Self::new(MAX_SELECTED_SEATS)
    }
}

impl SelectionSet {
    pub fn new(capacity: usize) -> Self {
        Self { seats: Vec::with_capacity(capacity), capacity }
    }

    /// Восстановление из сохранённого списка: дубликаты и лишнее сверх ёмкости отбрасываются.
    pub fn from_seats(seats: Vec<SelectedSeat>, capacity: usize) -> Self {
        let mut set = Self::new(capacity);
        for seat in seats {
            if set.seats.len() >= capacity {
                break;
            }
            if !set.contains(seat.id()) {
                set.seats.push(seat);
            }
        }
        set
    }

    /// Выбор из панели деталей: повторный выбор ничего не меняет.
    pub fn select(&mut self, seat: &SelectedSeat) -> SelectOutcome {
        if !seat.seat.status.is_selectable() {
            return SelectOutcome::NotSelectable;
        }
        if self.contains(seat.id()) {
            return SelectOutcome::AlreadySelected;
        }
        self.push(seat)
    }

    /// Выбор с карты (клик, Enter): повторный выбор снимает место.
    pub fn toggle(&mut self, seat: &SelectedSeat) -> SelectOutcome {
        if !seat.seat.status.is_selectable() {
            return SelectOutcome::NotSelectable;
        }
        if self.remove(seat.id()) {
            return SelectOutcome::Removed;
        }
        self.push(seat)
    }

    pub fn remove(&mut self, seat_id: &str) -> bool {
        let before = self.seats.len();
        self.seats.retain(|s| s.id() != seat_id);
        self.seats.len() != before
    }

    fn push(&mut self, seat: &SelectedSeat) -> SelectOutcome {
        if self.is_full() {
            return SelectOutcome::Full;
        }
        self.seats.push(seat.clone());
        SelectOutcome::Added
    }

    pub fn contains(&self, seat_id: &str) -> bool {
        self.seats.iter().any(|s| s.id() == seat_id)
    }

    pub fn seats(&self) -> &[SelectedSeat] {
        &self.seats
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.seats.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn subtotal(&self) -> u32 {
        self.seats.iter().map(|s| s.seat.price()).sum()
    }
}
