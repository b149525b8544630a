//! Shared types for the store platform
//!
//! Domain models and utility types used by the store server and
//! its admin/storefront clients.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
