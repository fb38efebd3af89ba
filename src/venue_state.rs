//! Снимки зала с копированием при записи.
//!
//! Меняется только через `VenueStore::apply`, который публикует
//! новый `Arc<Venue>` целиком. Читатели держат неизменяемые снимки и
//! никогда не видят частично обновлённый список секций.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::models::{RelayMessage, Venue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Updated,
    UnknownSeat,
    UnknownStatus,
}

#[derive(Debug, Clone)]
pub struct VenueStore {
    tx: Arc<watch::Sender<Arc<Venue>>>,
}

impl VenueStore {
    pub fn new(venue: Venue) -> Self {
        let (tx, _) = watch::channel(Arc::new(venue));
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> Arc<Venue> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Venue>> {
        self.tx.subscribe()
    }

    /// Применить статус из ретранслятора. Неизвестные места и статусы игнорируются.
    pub fn apply(&self, message: &RelayMessage) -> ApplyOutcome {
        let status = match message.seat_status() {
            Ok(status) => status,
            Err(e) => {
                warn!("Dropping relay update for {}: {}", message.seat_id, e);
                return ApplyOutcome::UnknownStatus;
            }
        };

        let mut outcome = ApplyOutcome::UnknownSeat;
        self.tx.send_if_modified(|current| match current.with_seat_status(&message.seat_id, status) {
            Some(next) => {
                *current = Arc::new(next);
                outcome = ApplyOutcome::Updated;
                true
            }
            None => false,
        });

        match outcome {
            ApplyOutcome::Updated => debug!("Seat {} -> {}", message.seat_id, status),
            _ => debug!("Ignoring update for unknown seat {}", message.seat_id),
        }
        outcome
    }

    /// Полная замена зала (например, после ручной перезагрузки).
    pub fn replace(&self, venue: Venue) {
        self.tx.send_replace(Arc::new(venue));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::venue::fixtures::{seat, venue};
    use crate::models::SeatStatus::{self, *};

    fn store() -> VenueStore {
        VenueStore::new(venue(vec![(
            "A",
            vec![vec![seat("A-1-01", 0.0, 0.0, Available), seat("A-1-02", 30.0, 0.0, Available)]],
        )]))
    }

    fn status_of(venue: &Venue, id: &str) -> SeatStatus {
        venue.seats().find(|(_, _, s)| s.id == id).unwrap().2.status
    }

    #[test]
    fn update_publishes_new_snapshot_and_keeps_old_one() {
        let store = store();
        let before = store.snapshot();
        let mut rx = store.subscribe();

        let outcome = store.apply(&RelayMessage::new("A-1-01", Reserved));
        assert_eq!(outcome, ApplyOutcome::Updated);
        assert!(rx.has_changed().unwrap());

        let after = rx.borrow_and_update().clone();
        assert_eq!(status_of(&after, "A-1-01"), Reserved);
        assert_eq!(status_of(&before, "A-1-01"), Available);
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn unknown_seat_does_not_notify() {
        let store = store();
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        assert_eq!(store.apply(&RelayMessage::new("Z-9-99", Sold)), ApplyOutcome::UnknownSeat);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn unknown_status_is_dropped() {
        let store = store();
        let message = RelayMessage {
            seat_id: "A-1-01".to_string(),
            status: "teleported".to_string(),
        };
        assert_eq!(store.apply(&message), ApplyOutcome::UnknownStatus);
        assert_eq!(status_of(&store.snapshot(), "A-1-01"), Available);
    }
}
