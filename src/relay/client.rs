//! Клиент ретранслятора с переподключением.
//!
//! После разрыва ждёт фиксированную паузу и пробует снова, не больше
//! заданного числа попыток подряд. Счётчик сбрасывается при каждом
//! успешном подключении. Исчерпав попытки, клиент останавливается и
//! остаётся в состоянии `Offline`.

use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::models::RelayMessage;
use crate::venue_state::VenueStore;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    /// Попытки исчерпаны или клиент остановлен. Живых обновлений больше не будет.
    Offline,
}

#[derive(Debug, Clone)]
pub struct RelayClient {
    pub url: String,
    pub reconnect_delay: Duration,
    pub max_reconnect_attempts: u32,
}

pub struct RelayHandle {
    outbound: mpsc::UnboundedSender<RelayMessage>,
    state: watch::Receiver<ConnectionState>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RelayHandle {
    /// Канал для исходящих сообщений. Пока соединения нет, сообщения теряются.
    pub fn sender(&self) -> mpsc::UnboundedSender<RelayMessage> {
        self.outbound.clone()
    }

    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}

enum PumpEnd {
    Disconnected,
    Shutdown,
}

impl RelayClient {
    pub fn new(url: impl Into<String>, reconnect_delay: Duration, max_reconnect_attempts: u32) -> Self {
        Self {
            url: url.into(),
            reconnect_delay,
            max_reconnect_attempts,
        }
    }

    pub fn from_config(config: &crate::config::ClientConfig) -> Self {
        Self::new(
            config.relay_url.clone(),
            config.reconnect_delay(),
            config.max_reconnect_attempts,
        )
    }

    /// Запускает клиента в фоне. Входящие статусы применяются к `store`.
    pub fn spawn(self, store: VenueStore) -> RelayHandle {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(self.run(store, outbound_rx, state_tx, shutdown_rx));

        RelayHandle {
            outbound: outbound_tx,
            state: state_rx,
            shutdown: shutdown_tx,
            task,
        }
    }

    async fn run(
        self,
        store: VenueStore,
        mut outbound: mpsc::UnboundedReceiver<RelayMessage>,
        state: watch::Sender<ConnectionState>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let mut attempts = 0u32;

        loop {
            if *shutdown.borrow() {
                break;
            }
            state.send_replace(ConnectionState::Connecting);

            match connect_async(self.url.as_str()).await {
                Ok((stream, _)) => {
                    attempts = 0;
                    state.send_replace(ConnectionState::Connected);
                    info!("Relay connected: {}", self.url);

                    let dropped = drain(&mut outbound);
                    if dropped > 0 {
                        debug!("Dropped {} messages queued while offline", dropped);
                    }

                    if let PumpEnd::Shutdown = pump(stream, &store, &mut outbound, &mut shutdown).await {
                        break;
                    }
                    state.send_replace(ConnectionState::Connecting);
                }
                Err(e) => warn!("Relay connection error: {}", e),
            }

            if attempts >= self.max_reconnect_attempts {
                info!("Relay connection failed after max attempts. Live updates disabled.");
                break;
            }
            attempts += 1;
            info!(
                "Relay disconnected, attempting to reconnect... ({}/{})",
                attempts, self.max_reconnect_attempts
            );

            tokio::select! {
                _ = tokio::time::sleep(self.reconnect_delay) => {}
                _ = shutdown.changed() => break,
            }
        }

        state.send_replace(ConnectionState::Offline);
    }
}

fn drain(outbound: &mut mpsc::UnboundedReceiver<RelayMessage>) -> usize {
    let mut dropped = 0;
    while outbound.try_recv().is_ok() {
        dropped += 1;
    }
    dropped
}

async fn pump(
    stream: WsStream,
    store: &VenueStore,
    outbound: &mut mpsc::UnboundedReceiver<RelayMessage>,
    shutdown: &mut watch::Receiver<bool>,
) -> PumpEnd {
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => handle_inbound(store, text.as_str()),
                Some(Ok(Message::Close(_))) | None => return PumpEnd::Disconnected,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Relay socket error: {}", e);
                    return PumpEnd::Disconnected;
                }
            },
            message = outbound.recv() => match message {
                Some(message) => {
                    if let Err(e) = write.send(Message::text(message.to_json())).await {
                        warn!("Failed to send relay message for {}: {}", message.seat_id, e);
                        return PumpEnd::Disconnected;
                    }
                }
                // Все отправители закрыты, хозяин клиента ушёл
                None => return PumpEnd::Shutdown,
            },
            _ = shutdown.changed() => {
                let _ = write.send(Message::Close(None)).await;
                return PumpEnd::Shutdown;
            }
        }
    }
}

fn handle_inbound(store: &VenueStore, text: &str) {
    match RelayMessage::parse(text) {
        Ok(message) => {
            store.apply(&message);
        }
        Err(e) => warn!("Error parsing relay message: {}", e),
    }
}
