use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::venue_client::VENUE_CANDIDATES;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/venue-generated.json", get(generated_venue))
        .route("/venue.json", get(base_venue))
}

// GET /venue-generated.json
async fn generated_venue(State(state): State<Arc<AppState>>) -> Response {
    serve_venue_document(&state, VENUE_CANDIDATES[0]).await
}

// GET /venue.json
async fn base_venue(State(state): State<Arc<AppState>>) -> Response {
    serve_venue_document(&state, VENUE_CANDIDATES[1]).await
}

// Документ отдаётся как есть: разбирает и проверяет его клиент
async fn serve_venue_document(state: &AppState, name: &str) -> Response {
    let path = state.config.venue.dir.join(name);
    match tokio::fs::read(&path).await {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, format!("{} not found", name)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to read venue document {}: {:?}", path.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read venue data".to_string()).into_response()
        }
    }
}
