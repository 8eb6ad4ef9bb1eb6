//! Shared fixtures and store doubles for the check-in unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, CheckInMethod, Event, User};
use crate::store::{BookingStore, CommitOutcome, MemoryBookingStore, StoreError};

pub struct Fixture {
    pub user: User,
    pub event: Event,
    pub booking: Booking,
}

pub mod fixtures {
    use super::*;

    pub fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Ada Obi".to_string(),
            email: "ada@example.com".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn event_starting(start: DateTime<Utc>) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            title: "Rust Meetup".to_string(),
            description: None,
            location: "Main Hall".to_string(),
            event_date: start,
            status: "published".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn booking_with_status(event: &Event, user: &User, status: BookingStatus) -> Booking {
        let now = Utc::now();
        let checked_in = status == BookingStatus::CheckedIn;
        Booking {
            id: Uuid::new_v4(),
            ticket_code: format!("EVT-{}", &Uuid::new_v4().simple().to_string()[..8]),
            event_id: event.id,
            user_id: user.id,
            status,
            booked_at: now,
            checked_in_at: checked_in.then_some(now),
            checked_in_by: checked_in.then(|| "gate-1".to_string()),
            check_in_method: checked_in.then_some(CheckInMethod::QrScan),
            updated_at: now,
        }
    }

    pub async fn seed_with_start(store: &MemoryBookingStore, start: DateTime<Utc>) -> Fixture {
        let user = user();
        let event = event_starting(start);
        let booking = booking_with_status(&event, &user, BookingStatus::Confirmed);
        store.insert_user(user.clone()).await;
        store.insert_event(event.clone()).await;
        store.insert_booking(booking.clone()).await;
        Fixture {
            user,
            event,
            booking,
        }
    }

    pub async fn seed_confirmed(store: &MemoryBookingStore) -> Fixture {
        seed_with_start(store, Utc::now()).await
    }
}

/// Store wrapper that counts read lookups, for asserting the sanitization
/// boundary (rejected input must never reach the store).
pub struct RecordingStore<S> {
    inner: S,
    lookups: AtomicUsize,
}

impl<S> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: BookingStore> BookingStore for RecordingStore<S> {
    async fn booking_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.booking_by_id(id).await
    }

    async fn booking_by_ticket_code(&self, code: &str) -> Result<Option<Booking>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.booking_by_ticket_code(code).await
    }

    async fn event_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.event_by_id(id).await
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.user_by_id(id).await
    }

    async fn commit_check_in(
        &self,
        booking_id: Uuid,
        operator_id: &str,
        method: CheckInMethod,
        at: DateTime<Utc>,
    ) -> Result<CommitOutcome, StoreError> {
        self.inner
            .commit_check_in(booking_id, operator_id, method, at)
            .await
    }

    async fn checked_in_count(&self, event_id: Uuid) -> Result<i64, StoreError> {
        self.inner.checked_in_count(event_id).await
    }
}

/// Store wrapper whose operations stall far past any reasonable timeout,
/// counting each started operation. Used with paused tokio time to
/// exercise the engine's timeout branch.
pub struct StalledStore<S> {
    inner: S,
    stalls: AtomicUsize,
}

impl<S> StalledStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            stalls: AtomicUsize::new(0),
        }
    }

    /// How many operations were started (and presumably abandoned).
    pub fn stalls(&self) -> usize {
        self.stalls.load(Ordering::SeqCst)
    }

    async fn stall(&self) {
        self.stalls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_secs(600)).await;
    }
}

#[async_trait]
impl<S: BookingStore> BookingStore for StalledStore<S> {
    async fn booking_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        self.stall().await;
        self.inner.booking_by_id(id).await
    }

    async fn booking_by_ticket_code(&self, code: &str) -> Result<Option<Booking>, StoreError> {
        self.stall().await;
        self.inner.booking_by_ticket_code(code).await
    }

    async fn event_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        self.stall().await;
        self.inner.event_by_id(id).await
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.stall().await;
        self.inner.user_by_id(id).await
    }

    async fn commit_check_in(
        &self,
        booking_id: Uuid,
        operator_id: &str,
        method: CheckInMethod,
        at: DateTime<Utc>,
    ) -> Result<CommitOutcome, StoreError> {
        self.stall().await;
        self.inner
            .commit_check_in(booking_id, operator_id, method, at)
            .await
    }

    async fn checked_in_count(&self, event_id: Uuid) -> Result<i64, StoreError> {
        self.inner.checked_in_count(event_id).await
    }
}

/// Store wrapper that fails the first `n` operations with an infra error,
/// then delegates. Used to test the bounded retry.
pub struct FlakyStore<S> {
    inner: S,
    failures_left: AtomicUsize,
}

impl<S> FlakyStore<S> {
    pub fn failing_first(n: usize, inner: S) -> Self {
        Self {
            inner,
            failures_left: AtomicUsize::new(n),
        }
    }

    fn should_fail(&self) -> bool {
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn unavailable() -> StoreError {
        StoreError::Unavailable("injected outage".to_string())
    }
}

#[async_trait]
impl<S: BookingStore> BookingStore for FlakyStore<S> {
    async fn booking_by_id(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        if self.should_fail() {
            return Err(Self::unavailable());
        }
        self.inner.booking_by_id(id).await
    }

    async fn booking_by_ticket_code(&self, code: &str) -> Result<Option<Booking>, StoreError> {
        if self.should_fail() {
            return Err(Self::unavailable());
        }
        self.inner.booking_by_ticket_code(code).await
    }

    async fn event_by_id(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        if self.should_fail() {
            return Err(Self::unavailable());
        }
        self.inner.event_by_id(id).await
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        if self.should_fail() {
            return Err(Self::unavailable());
        }
        self.inner.user_by_id(id).await
    }

    async fn commit_check_in(
        &self,
        booking_id: Uuid,
        operator_id: &str,
        method: CheckInMethod,
        at: DateTime<Utc>,
    ) -> Result<CommitOutcome, StoreError> {
        if self.should_fail() {
            return Err(Self::unavailable());
        }
        self.inner
            .commit_check_in(booking_id, operator_id, method, at)
            .await
    }

    async fn checked_in_count(&self, event_id: Uuid) -> Result<i64, StoreError> {
        self.inner.checked_in_count(event_id).await
    }
}
