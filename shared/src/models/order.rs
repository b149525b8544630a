//! Order Model (订单)
//!
//! Minimal projection of the checkout subsystem's order. The scheduling
//! core only reads it to link an appointment and writes one flag.

use serde::{Deserialize, Serialize};

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub store_id: i64,
    pub client_id: i64,
    /// Human-facing order number (unique per store)
    pub number: String,
    /// Set once an active appointment references this order
    pub has_appointment: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
