//! Availability API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Availability router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stores/{store_id}/availability", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::list))
}
