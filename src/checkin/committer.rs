//! The exactly-once commit step.
//!
//! The validator has already said "proceed" by the time this runs, but that
//! read may be stale: another gate device can commit the same booking in
//! between. The store's conditional update is the arbiter; a refused write
//! is classified from the row the store hands back, never retried as if it
//! were an infrastructure failure.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::checkin::error::CheckInError;
use crate::models::{Booking, BookingStatus, CheckInMethod};
use crate::store::{BookingStore, CommitOutcome};

/// Identity of the gate operator performing check-ins. Always passed
/// explicitly; the committer fails closed when it is empty.
#[derive(Debug, Clone)]
pub struct Operator {
    pub id: String,
}

impl Operator {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

pub async fn commit<S: BookingStore>(
    store: &S,
    booking_id: Uuid,
    operator: &Operator,
    method: CheckInMethod,
    at: DateTime<Utc>,
) -> Result<Booking, CheckInError> {
    if operator.id.trim().is_empty() {
        return Err(CheckInError::AuthRequired);
    }

    match store
        .commit_check_in(booking_id, &operator.id, method, at)
        .await?
    {
        CommitOutcome::Committed(booking) => {
            tracing::info!(
                booking_id = %booking.id,
                operator = %operator.id,
                method = ?method,
                "booking checked in"
            );
            Ok(booking)
        }
        CommitOutcome::Conflict(current) => Err(classify_conflict(&current)),
        CommitOutcome::Missing => Err(CheckInError::NotFound),
    }
}

fn classify_conflict(current: &Booking) -> CheckInError {
    match current.status {
        BookingStatus::CheckedIn => CheckInError::AlreadyCheckedIn {
            attendee_name: None,
            previous_scan_at: current.checked_in_at,
        },
        BookingStatus::Cancelled => CheckInError::Cancelled,
        BookingStatus::Waitlisted => CheckInError::Waitlisted,
        // The conditional write was refused yet the row reads as confirmed:
        // the status changed under us twice. Surface as transient so the
        // operator can simply rescan.
        BookingStatus::Confirmed => CheckInError::Transient {
            reason: "booking changed during commit".to_string(),
        },
    }
}
