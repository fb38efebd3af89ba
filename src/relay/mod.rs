//! Ретранслятор статусов мест.
//!
//! Без состояния: каждое корректное сообщение клиента рассылается как есть
//! всем остальным открытым соединениям, но не отправителю. У каждого
//! соединения своя неограниченная очередь, медленный клиент ничего не теряет.
//! Подтверждений, хранения и проверки значения статуса нет. Отключённый
//! клиент теряет всё, что было разослано без него.

pub mod client;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::error::RelayError;
use crate::models::RelayMessage;

pub use client::{ConnectionState, RelayClient, RelayHandle};

type Peers = HashMap<Uuid, mpsc::UnboundedSender<Arc<str>>>;

#[derive(Clone, Default)]
pub struct RelayHub {
    peers: Arc<RwLock<Peers>>,
}

impl RelayHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Регистрирует новое соединение. Оно получает кадры до drop.
    pub fn connect(&self) -> RelayConnection {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.peers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, tx);
        RelayConnection {
            id,
            rx,
            peers: self.peers.clone(),
        }
    }

    pub fn connection_count(&self) -> usize {
        self.peers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Проверяет кадр и ставит его в очередь каждому соединению, кроме отправителя.
    /// Возвращает число получателей.
    pub fn publish(&self, sender: Uuid, text: &str) -> Result<usize, RelayError> {
        let message = RelayMessage::parse(text)?;
        debug!("Broadcasting: {} -> {}", message.seat_id, message.status);

        let text: Arc<str> = Arc::from(text);
        let peers = self.peers.read().unwrap_or_else(PoisonError::into_inner);
        let mut delivered = 0;
        for (id, tx) in peers.iter() {
            if *id != sender && tx.send(text.clone()).is_ok() {
                delivered += 1;
            }
        }
        Ok(delivered)
    }
}

pub struct RelayConnection {
    id: Uuid,
    rx: mpsc::UnboundedReceiver<Arc<str>>,
    peers: Arc<RwLock<Peers>>,
}

impl RelayConnection {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Следующий чужой кадр в порядке публикации.
    pub async fn recv(&mut self) -> Option<Arc<str>> {
        self.rx.recv().await
    }
}

impl Drop for RelayConnection {
    fn drop(&mut self) {
        self.peers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &str = r#"{"seatId":"A-1-01","status":"reserved"}"#;

    #[tokio::test]
    async fn fans_out_to_everyone_but_sender() {
        let hub = RelayHub::new();
        let mut x = hub.connect();
        let mut y = hub.connect();
        let mut z = hub.connect();
        assert_eq!(hub.connection_count(), 3);

        hub.publish(x.id(), MESSAGE).unwrap();
        assert_eq!(y.recv().await.as_deref(), Some(MESSAGE));
        assert_eq!(z.recv().await.as_deref(), Some(MESSAGE));

        // Отправитель видит только следующий чужой кадр
        hub.publish(y.id(), r#"{"seatId":"A-1-02","status":"sold"}"#).unwrap();
        assert_eq!(x.recv().await.as_deref(), Some(r#"{"seatId":"A-1-02","status":"sold"}"#));
    }

    #[tokio::test]
    async fn forwards_text_verbatim() {
        let hub = RelayHub::new();
        let x = hub.connect();
        let mut y = hub.connect();
        let raw = r#"{ "status": "held", "seatId": "B-2-07", "extra": 1 }"#;
        hub.publish(x.id(), raw).unwrap();
        assert_eq!(y.recv().await.as_deref(), Some(raw));
    }

    #[test]
    fn malformed_messages_are_not_broadcast() {
        let hub = RelayHub::new();
        let x = hub.connect();
        let mut y = hub.connect();
        assert!(hub.publish(x.id(), "hello").is_err());
        assert!(hub.publish(x.id(), r#"{"seatId":"A-1-01"}"#).is_err());
        assert!(y.rx.try_recv().is_err());
    }

    #[test]
    fn dropping_connection_updates_count() {
        let hub = RelayHub::new();
        let x = hub.connect();
        drop(hub.connect());
        assert_eq!(hub.connection_count(), 1);
        drop(x);
        assert_eq!(hub.connection_count(), 0);
    }

    #[tokio::test]
    async fn slow_reader_receives_every_frame() {
        let hub = RelayHub::new();
        let x = hub.connect();
        let mut y = hub.connect();

        let frames: Vec<String> = (1..=2_000)
            .map(|n| format!(r#"{{"seatId":"A-1-{:02}","status":"sold"}}"#, n))
            .collect();
        for frame in &frames {
            assert_eq!(hub.publish(x.id(), frame).unwrap(), 1);
        }

        for frame in &frames {
            assert_eq!(y.recv().await.as_deref(), Some(frame.as_str()));
        }
        assert!(y.rx.try_recv().is_err());
    }

    #[test]
    fn sender_queue_stays_empty() {
        let hub = RelayHub::new();
        let mut x = hub.connect();
        let _y = hub.connect();
        for _ in 0..10 {
            hub.publish(x.id(), MESSAGE).unwrap();
        }
        assert!(x.rx.try_recv().is_err());
    }
}
