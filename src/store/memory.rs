use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, CheckInMethod, Event, User};
use crate::store::{BookingStore, CommitOutcome, StoreError};

#[derive(Default)]
struct Inner {
    bookings: HashMap<Uuid, Booking>,
    events: HashMap<Uuid, Event>,
    users: HashMap<Uuid, User>,
}

/// In-memory store for development and tests. The conditional commit runs
/// under a single write lock, which gives it the same compare-and-set
/// semantics as the Postgres conditional update.
#[derive(Default)]
pub struct MemoryBookingStore {
    inner: RwLock<Inner>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id, user);
    }

    pub async fn insert_event(&self, event: Event) {
        self.inner.write().await.events.insert(event.id, event);
    }

    pub async fn insert_booking(&self, booking: Booking) {
        self.inner.write().await.bookings.insert(booking.id, booking);
    }

    pub async fn remove_event(&self, id: Uuid) {
        self.inner.write().await.events.remove(&id);
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn booking_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        Ok(self.inner.read().await.bookings.get(&id).cloned())
    }

    async fn booking_by_ticket_code(&self, code: &str) -> Result<Option<Booking>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .values()
            .find(|b| b.ticket_code == code)
            .cloned())
    }

    async fn event_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        Ok(self.inner.read().await.events.get(&id).cloned())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn commit_check_in(
        &self,
        booking_id: Uuid,
        operator_id: &str,
        method: CheckInMethod,
        at: DateTime<Utc>,
    ) -> Result<CommitOutcome, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(booking) = inner.bookings.get_mut(&booking_id) else {
            return Ok(CommitOutcome::Missing);
        };

        if booking.status != BookingStatus::Confirmed {
            return Ok(CommitOutcome::Conflict(booking.clone()));
        }

        booking.status = BookingStatus::CheckedIn;
        booking.checked_in_at = Some(at);
        booking.checked_in_by = Some(operator_id.to_string());
        booking.check_in_method = Some(method);
        booking.updated_at = at;
        Ok(CommitOutcome::Committed(booking.clone()))
    }

    async fn checked_in_count(&self, event_id: Uuid) -> Result<i64, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .values()
            .filter(|b| b.event_id == event_id && b.status == BookingStatus::CheckedIn)
            .count() as i64)
    }
}
