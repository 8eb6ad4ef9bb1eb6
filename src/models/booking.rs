use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Booking lifecycle status. `CheckedIn` is terminal with respect to
/// check-in: the committer never transitions a booking twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Waitlisted,
    Cancelled,
    CheckedIn,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Waitlisted => "waitlisted",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::CheckedIn => "checked_in",
        }
    }
}

/// How a check-in was performed, recorded for provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "check_in_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CheckInMethod {
    QrScan,
    ManualEntry,
    TicketId,
    Auto,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    /// Human-presentable code printed on the ticket, unique per booking.
    pub ticket_code: String,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_in_by: Option<String>,
    pub check_in_method: Option<CheckInMethod>,
    pub updated_at: DateTime<Utc>,
}
