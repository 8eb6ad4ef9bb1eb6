use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Booking, CheckInMethod, Event, User};
use crate::store::{BookingStore, CommitOutcome, StoreError};

/// Postgres-backed store. The check-in commit is a single conditional
/// `UPDATE ... WHERE status = 'confirmed'`, so concurrent devices racing on
/// the same booking resolve at the database: exactly one update matches.
#[derive(Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn booking_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(booking)
    }

    async fn booking_by_ticket_code(&self, code: &str) -> Result<Option<Booking>, StoreError> {
        let booking =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE ticket_code = $1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;
        Ok(booking)
    }

    async fn event_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn commit_check_in(
        &self,
        booking_id: Uuid,
        operator_id: &str,
        method: CheckInMethod,
        at: DateTime<Utc>,
    ) -> Result<CommitOutcome, StoreError> {
        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings
             SET status = 'checked_in',
                 checked_in_at = $2,
                 checked_in_by = $3,
                 check_in_method = $4,
                 updated_at = $2
             WHERE id = $1 AND status = 'confirmed'
             RETURNING *",
        )
        .bind(booking_id)
        .bind(at)
        .bind(operator_id)
        .bind(method)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(booking) = updated {
            return Ok(CommitOutcome::Committed(booking));
        }

        // The conditional write matched nothing; re-read only to classify.
        match self.booking_by_id(booking_id).await? {
            Some(current) => Ok(CommitOutcome::Conflict(current)),
            None => Ok(CommitOutcome::Missing),
        }
    }

    async fn checked_in_count(&self, event_id: Uuid) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE event_id = $1 AND status = 'checked_in'",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
