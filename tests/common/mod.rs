#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use seat_map::config::{AppConfig, ClientConfig, Config, VenueConfig};
use seat_map::models::Venue;
use seat_map::{build_router, AppState};

pub fn test_config(venue_dir: &Path) -> Config {
    Config {
        app: AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            rust_log: "seat_map=debug".to_string(),
            log_json: false,
        },
        venue: VenueConfig {
            dir: venue_dir.to_path_buf(),
        },
        client: ClientConfig {
            venue_base_url: String::new(),
            relay_url: String::new(),
            reconnect_delay_ms: 50,
            max_reconnect_attempts: 5,
            selection_path: PathBuf::from("unused.json"),
        },
    }
}

pub async fn start_server(config: Config) -> (SocketAddr, Arc<AppState>) {
    let state = AppState::new(config);
    let app = build_router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

/// Ждёт, пока на ретрансляторе откроется нужное число соединений.
pub async fn wait_for_connections(state: &AppState, expected: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while state.relay.connection_count() != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("relay connections did not open in time");
}

pub fn small_venue() -> Venue {
    serde_json::from_value(serde_json::json!({
        "venueId": "arena-01",
        "name": "Metropolis Arena",
        "map": { "width": 200, "height": 100 },
        "sections": [{
            "id": "A",
            "label": "Lower Bowl A",
            "transform": { "x": 0, "y": 0, "scale": 1 },
            "rows": [
                { "index": 1, "seats": [
                    { "id": "A-1-01", "col": 1, "x": 50, "y": 40, "priceTier": 1, "status": "available" },
                    { "id": "A-1-02", "col": 2, "x": 70, "y": 40, "priceTier": 2, "status": "available" },
                    { "id": "A-1-03", "col": 3, "x": 90, "y": 40, "priceTier": 3, "status": "sold" }
                ]},
                { "index": 2, "seats": [
                    { "id": "A-2-01", "col": 1, "x": 50, "y": 60, "priceTier": 1, "status": "available" },
                    { "id": "A-2-02", "col": 2, "x": 70, "y": 60, "priceTier": 4, "status": "held" }
                ]}
            ]
        }]
    }))
    .unwrap()
}
