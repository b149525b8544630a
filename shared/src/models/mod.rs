//! Data models
//!
//! Shared between store-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod appointment;
pub mod client;
pub mod order;
pub mod schedule_config;

// Re-exports
pub use appointment::*;
pub use client::*;
pub use order::*;
pub use schedule_config::*;
