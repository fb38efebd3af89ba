pub mod config;
pub mod error;
pub mod models;
pub mod spatial;
pub mod navigation;
pub mod selection;
pub mod search;
pub mod storage;
pub mod venue_state;
pub mod venue_client;
pub mod relay;
pub mod session;
pub mod viewport;
pub mod generator;
pub mod controllers;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// Shared state для сервера ретранслятора
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub relay: relay::RelayHub,
}

impl AppState {
    pub fn new(config: config::Config) -> Arc<Self> {
        let relay = relay::RelayHub::new();
        Arc::new(Self { config, relay })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Seat Map Relay v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .merge(controllers::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
