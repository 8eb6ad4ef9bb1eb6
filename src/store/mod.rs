//! Persistence collaborator for the check-in engine.
//!
//! The engine only ever talks to a [`BookingStore`]; the production
//! implementation is Postgres-backed, and an in-memory store exists for
//! development and tests. The one non-obvious requirement is
//! [`BookingStore::commit_check_in`]: it must be a genuine conditional
//! update (compare-and-set on the booking status), never a read followed
//! by an unconditional write.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Booking, CheckInMethod, Event, User};

pub use memory::MemoryBookingStore;
pub use postgres::PgBookingStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result of a conditional check-in write.
#[derive(Debug, Clone)]
pub enum CommitOutcome {
    /// The booking was `confirmed` and is now `checked_in`.
    Committed(Booking),
    /// The booking exists but was not `confirmed`; carries the row as it
    /// stood when the write was refused, so the caller can classify the
    /// conflict (already checked in, cancelled, ...).
    Conflict(Booking),
    /// The booking disappeared between resolution and commit.
    Missing,
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn booking_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;

    /// Secondary-index lookup by the human-presentable ticket code.
    async fn booking_by_ticket_code(&self, code: &str) -> Result<Option<Booking>, StoreError>;

    async fn event_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError>;

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Atomically transition a booking to `checked_in`, recording operator,
    /// method and time, only if its current status is `confirmed`.
    async fn commit_check_in(
        &self,
        booking_id: Uuid,
        operator_id: &str,
        method: CheckInMethod,
        at: DateTime<Utc>,
    ) -> Result<CommitOutcome, StoreError>;

    /// Number of checked-in bookings for an event (gate dashboard tally).
    async fn checked_in_count(&self, event_id: Uuid) -> Result<i64, StoreError>;
}
