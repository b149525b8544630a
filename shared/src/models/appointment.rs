//! Appointment Model (预约)

use serde::{Deserialize, Serialize};

/// Appointment status
///
/// `confirmado → concluido` and `confirmado → cancelado` are the only
/// transitions; both targets are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum AppointmentStatus {
    /// Booked and waiting for service
    Confirmado,
    /// Service performed
    Concluido,
    /// Cancelled; frees slot capacity immediately
    Cancelado,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmado => "confirmado",
            Self::Concluido => "concluido",
            Self::Cancelado => "cancelado",
        }
    }

    /// Terminal states admit no further transition
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Concluido | Self::Cancelado)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appointment entity — one booked slot for one order
///
/// Owned by the store: every query is scoped by `store_id`.
/// Cancellation is a status update, never a row delete, so the capacity
/// ledger keeps its full history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Appointment {
    pub id: i64,
    pub store_id: i64,
    pub order_id: i64,
    pub client_id: i64,
    /// Slot date ("YYYY-MM-DD")
    pub date: String,
    /// Slot start time ("HH:MM")
    pub time: String,
    pub status: AppointmentStatus,
    /// Free-form notes from the client or the counter
    pub observacoes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create appointment payload (public booking flow)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCreate {
    /// Order number shown on the checkout receipt
    pub order_number: String,
    /// Requested slot date ("YYYY-MM-DD")
    pub date: String,
    /// Requested slot start time ("HH:MM")
    pub time: String,
    pub observacoes: Option<String>,
}

/// Update appointment payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppointmentUpdate {
    /// Target status; `concluido` completes, `cancelado` cancels
    pub status: Option<AppointmentStatus>,
    pub observacoes: Option<String>,
}

/// One bookable slot with its live remaining capacity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlot {
    /// Slot start time ("HH:MM")
    pub time: String,
    /// Remaining capacity (> 0 in availability listings)
    pub remaining: i64,
}

/// Availability listing for one date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: String,
    pub slots: Vec<AvailableSlot>,
}
