//! Клиентская сессия карты мест.
//!
//! Обрабатывает дискретные события по одному: ввод пользователя и новые
//! снимки зала. Фокус и выбор независимы: фокусировать можно любое место,
//! а выбирать только доступные.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::SeatMapError;
use crate::models::{RelayMessage, SeatStatus, SelectedSeat, Venue};
use crate::navigation::{navigate, Direction};
use crate::search::find_seat;
use crate::selection::{SelectOutcome, SelectionSet, MAX_SELECTED_SEATS};
use crate::spatial::SpatialIndex;
use crate::storage::SelectionStore;

pub struct SeatMapSession {
    venue: Arc<Venue>,
    index: SpatialIndex,
    focused: Option<SelectedSeat>,
    selection: SelectionSet,
    store: Option<SelectionStore>,
    outbound: Option<mpsc::UnboundedSender<RelayMessage>>,
}

impl SeatMapSession {
    /// Новая сессия. Сохранённый выбор восстанавливается без мест, которых нет в зале.
    pub fn new(
        venue: Arc<Venue>,
        store: Option<SelectionStore>,
        outbound: Option<mpsc::UnboundedSender<RelayMessage>>,
    ) -> Self {
        let index = SpatialIndex::build(&venue);
        let restored = store
            .as_ref()
            .map(|store| store.restore(&venue))
            .unwrap_or_default();
        if !restored.is_empty() {
            info!("Restored {} selected seats", restored.len());
        }

        let session = Self {
            venue,
            index,
            focused: None,
            selection: SelectionSet::from_seats(restored, MAX_SELECTED_SEATS),
            store,
            outbound,
        };
        session.persist();
        session
    }

    pub fn venue(&self) -> &Arc<Venue> {
        &self.venue
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn focused(&self) -> Option<&SelectedSeat> {
        self.focused.as_ref()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Нормализованные координаты фокуса, вызывающий обязан прокрутить к ним карту.
    pub fn focus_position(&self) -> Option<(f64, f64)> {
        let focused = self.focused.as_ref()?;
        self.index.get(focused.id()).map(|s| (s.x, s.y))
    }

    /// Внешний запрос фокуса (клик, поиск). Доступность места не проверяется.
    pub fn focus(&mut self, seat_id: &str) -> Option<&SelectedSeat> {
        let seat = self.index.get(seat_id)?.seat.clone();
        Some(&*self.focused.insert(seat))
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    /// Шаг стрелкой. `false`, если фокус остался на месте.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        let current = self.focused.as_ref().map(|s| s.id());
        match navigate(&self.index, current, direction) {
            Some(next) => {
                debug!("Focus {} -> {} ({})", current.unwrap_or("-"), next.id(), direction);
                self.focused = Some(next.seat.clone());
                true
            }
            None => false,
        }
    }

    /// Поиск по id. Пустой запрос игнорируется: `Ok(None)`, фокус не меняется.
    pub fn search(&mut self, query: &str) -> Result<Option<&SelectedSeat>, SeatMapError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }
        match find_seat(&self.venue, query) {
            Some(seat) => Ok(Some(&*self.focused.insert(seat))),
            None => Err(SeatMapError::SeatNotFound(query.to_string())),
        }
    }

    /// Выбор из панели деталей.
    pub fn select(&mut self, seat_id: &str) -> SelectOutcome {
        self.change_selection(seat_id, false)
    }

    /// Выбор с карты (клик или Enter): повторный выбор снимает место.
    pub fn toggle(&mut self, seat_id: &str) -> SelectOutcome {
        self.change_selection(seat_id, true)
    }

    /// Enter по сфокусированному месту.
    pub fn select_focused(&mut self) -> Option<SelectOutcome> {
        let id = self.focused.as_ref()?.id().to_string();
        Some(self.toggle(&id))
    }

    pub fn remove(&mut self, seat_id: &str) -> bool {
        let removed = self.selection.remove(seat_id);
        if removed {
            self.persist();
        }
        removed
    }

    fn change_selection(&mut self, seat_id: &str, toggle: bool) -> SelectOutcome {
        let Some(seat) = self.index.get(seat_id).map(|s| s.seat.clone()) else {
            return SelectOutcome::NotSelectable;
        };

        let outcome = if toggle {
            self.selection.toggle(&seat)
        } else {
            self.selection.select(&seat)
        };

        if outcome == SelectOutcome::Added {
            self.notify(RelayMessage::new(seat.id(), SeatStatus::Reserved));
        }
        if outcome.changed() {
            self.persist();
        }
        // Место остаётся в фокусе после выбора
        self.focused = Some(seat);
        outcome
    }

    /// Новый снимок зала. Индекс перестраивается, фокус получает свежий статус.
    pub fn replace_venue(&mut self, venue: Arc<Venue>) {
        if Arc::ptr_eq(&self.venue, &venue) {
            return;
        }
        self.index = SpatialIndex::build(&venue);
        self.venue = venue;
        if let Some(focused) = &self.focused {
            self.focused = self.index.get(focused.id()).map(|s| s.seat.clone());
        }
    }

    fn notify(&self, message: RelayMessage) {
        let Some(outbound) = &self.outbound else {
            return;
        };
        if outbound.send(message).is_err() {
            warn!("Relay client is gone, selection not broadcast");
        }
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            store.save(self.selection.seats());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::venue::fixtures::{seat, venue};
    use crate::models::SeatStatus::*;

    fn sample() -> Arc<Venue> {
        Arc::new(venue(vec![(
            "A",
            vec![
                vec![
                    seat("A-1-01", 30.0, 30.0, Available),
                    seat("A-1-02", 60.0, 30.0, Sold),
                    seat("A-1-03", 90.0, 30.0, Held),
                ],
                vec![seat("A-2-01", 30.0, 55.0, Available)],
            ],
        )]))
    }

    fn session() -> (SeatMapSession, mpsc::UnboundedReceiver<RelayMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (SeatMapSession::new(sample(), None, Some(tx)), rx)
    }

    #[test]
    fn selecting_new_seat_emits_one_notification() {
        let (mut session, mut rx) = session();
        assert_eq!(session.select("A-1-01"), SelectOutcome::Added);
        assert_eq!(rx.try_recv().unwrap(), RelayMessage::new("A-1-01", Reserved));
        assert!(rx.try_recv().is_err());

        assert_eq!(session.select("A-1-01"), SelectOutcome::AlreadySelected);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn sold_seat_can_be_focused_but_not_selected() {
        let (mut session, mut rx) = session();
        assert!(session.focus("A-1-02").is_some());
        assert_eq!(session.select_focused(), Some(SelectOutcome::NotSelectable));
        assert!(session.selection().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn navigation_skips_sold_seats() {
        let (mut session, _rx) = session();
        assert!(session.navigate(Direction::Right));
        assert_eq!(session.focused().unwrap().id(), "A-1-01");
        assert!(session.navigate(Direction::Right));
        assert_eq!(session.focused().unwrap().id(), "A-1-03");
        assert!(!session.navigate(Direction::Right));
        assert_eq!(session.focused().unwrap().id(), "A-1-03");
        assert!(session.focus_position().is_some());
    }

    #[test]
    fn search_miss_keeps_focus() {
        let (mut session, _rx) = session();
        session.focus("A-2-01");
        let err = session.search("Z-9-99").unwrap_err();
        assert_eq!(err, SeatMapError::SeatNotFound("Z-9-99".to_string()));
        assert_eq!(session.focused().unwrap().id(), "A-2-01");

        let found = session.search(" a-1-03 ").unwrap().unwrap();
        assert_eq!(found.section_label, "Section A");
        assert_eq!(session.focused().unwrap().id(), "A-1-03");
    }

    #[test]
    fn blank_search_is_ignored() {
        let (mut session, _rx) = session();
        session.focus("A-2-01");
        assert_eq!(session.search("").unwrap(), None);
        assert_eq!(session.search("   ").unwrap(), None);
        assert_eq!(session.focused().unwrap().id(), "A-2-01");
    }

    #[test]
    fn new_snapshot_refreshes_focus_status() {
        let (mut session, _rx) = session();
        session.focus("A-1-01");
        let next = session.venue().with_seat_status("A-1-01", Sold).unwrap();
        session.replace_venue(Arc::new(next));
        assert_eq!(session.focused().unwrap().seat.status, Sold);
        assert_eq!(session.toggle("A-1-01"), SelectOutcome::NotSelectable);
    }

    #[test]
    fn selection_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let store = SelectionStore::new(dir.path().join("storage.json"));

        let mut first = SeatMapSession::new(sample(), Some(store.clone()), None);
        first.select("A-1-01");
        first.select("A-2-01");
        first.remove("A-2-01");
        drop(first);

        let second = SeatMapSession::new(sample(), Some(store), None);
        let ids: Vec<&str> = second.selection().seats().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["A-1-01"]);
    }
}
