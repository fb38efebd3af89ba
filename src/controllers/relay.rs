use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

use crate::relay::RelayHub;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ws", get(relay_socket))
}

// GET /ws
async fn relay_socket(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> Response {
    let hub = state.relay.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

async fn handle_socket(socket: WebSocket, hub: RelayHub) {
    let mut connection = hub.connect();
    let id = connection.id();
    info!("Client {} connected ({} open)", id, hub.connection_count());

    let (mut sender, mut receiver) = socket.split();

    // Чужие кадры -> этот клиент
    let mut send_task = tokio::spawn(async move {
        while let Some(text) = connection.recv().await {
            if sender.send(Message::Text(text.as_ref().into())).await.is_err() {
                break;
            }
        }
    });

    // Кадры этого клиента -> всем остальным
    let publisher = hub.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    if let Err(e) = publisher.publish(id, text.as_str()) {
                        warn!("Dropping message from {}: {}", id, e);
                    }
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("WebSocket error from {}: {}", id, e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!("Client {} disconnected", id);
}
