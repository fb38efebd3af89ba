pub mod relay;
pub mod venue;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(relay::routes())
        .merge(venue::routes())
}
