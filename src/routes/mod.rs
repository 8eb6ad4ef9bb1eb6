use axum::{
    routing::{get, post},
    Router,
};

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::checkin::check_in;
use crate::handlers::events::{checked_in_count, get_event};
use crate::handlers::health_check;
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/check-in", post(check_in))
        .route("/api/events/:event_id", get(get_event))
        .route("/api/events/:event_id/checked-in-count", get(checked_in_count))
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
