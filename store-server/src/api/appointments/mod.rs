//! Appointment API Module
//!
//! Booking goes through the coordinator; nothing here writes
//! appointment rows directly.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Appointment router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stores/{store_id}/appointments", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
}
