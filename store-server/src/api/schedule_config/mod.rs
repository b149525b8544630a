//! Schedule Config API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Schedule config router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stores/{store_id}/schedule-config", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::get).put(handler::update))
}
