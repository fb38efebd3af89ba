mod common;

use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use seat_map::models::{RelayMessage, SeatStatus};
use seat_map::relay::{ConnectionState, RelayClient};
use seat_map::venue_state::VenueStore;

use common::{small_venue, start_server, test_config, wait_for_connections};

fn status_of(store: &VenueStore, id: &str) -> Option<SeatStatus> {
    store
        .snapshot()
        .seats()
        .find(|(_, _, seat)| seat.id == id)
        .map(|(_, _, seat)| seat.status)
}

#[tokio::test]
async fn inbound_updates_reach_the_store_and_outbound_reach_peers() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, state) = start_server(test_config(dir.path())).await;
    let url = format!("ws://{}/ws", addr);

    let store = VenueStore::new(small_venue());
    let handle = RelayClient::new(url.clone(), Duration::from_millis(50), 5).spawn(store.clone());
    let mut connection = handle.state();
    tokio::time::timeout(
        Duration::from_secs(5),
        connection.wait_for(|s| *s == ConnectionState::Connected),
    )
    .await
    .unwrap()
    .unwrap();

    let (mut peer, _) = connect_async(url.as_str()).await.unwrap();
    wait_for_connections(&state, 2).await;

    let mut snapshots = store.subscribe();
    peer.send(Message::text(r#"{"seatId":"A-1-02","status":"sold"}"#))
        .await
        .unwrap();
    tokio::time::timeout(Duration::from_secs(5), snapshots.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(status_of(&store, "A-1-02"), Some(SeatStatus::Sold));

    // Неизвестный статус не меняет снимок
    peer.send(Message::text(r#"{"seatId":"A-1-01","status":"booked"}"#))
        .await
        .unwrap();

    handle
        .sender()
        .send(RelayMessage::new("A-2-01", SeatStatus::Reserved))
        .unwrap();
    let frame = tokio::time::timeout(Duration::from_secs(5), peer.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let received = RelayMessage::parse(frame.to_text().unwrap()).unwrap();
    assert_eq!(received, RelayMessage::new("A-2-01", SeatStatus::Reserved));
    assert_eq!(status_of(&store, "A-1-01"), Some(SeatStatus::Available));

    handle.shutdown().await;
    wait_for_connections(&state, 1).await;
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = VenueStore::new(small_venue());
    let handle = RelayClient::new(format!("ws://{}/ws", addr), Duration::from_millis(10), 2)
        .spawn(store);
    let mut connection = handle.state();

    tokio::time::timeout(
        Duration::from_secs(5),
        connection.wait_for(|s| *s == ConnectionState::Offline),
    )
    .await
    .unwrap()
    .unwrap();
}

#[tokio::test]
async fn reconnects_after_server_drops_connection() {
    // Сервер принимает три соединения, каждое закрывает сразу, потом исчезает
    let flaky = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let flaky_addr = flaky.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();
    tokio::spawn(async move {
        for _ in 0..3 {
            if let Ok((stream, _)) = flaky.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                if let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await {
                    ws.close(None).await.ok();
                }
            }
        }
    });

    let store = VenueStore::new(small_venue());
    let handle = RelayClient::new(format!("ws://{}/ws", flaky_addr), Duration::from_millis(10), 2)
        .spawn(store);
    let mut connection = handle.state();

    tokio::time::timeout(
        Duration::from_secs(5),
        connection.wait_for(|s| *s == ConnectionState::Offline),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(accepted.load(Ordering::SeqCst), 3);
}
