//! Booking validation: one outcome per attempt, in a fixed precedence.
//!
//! A booking can satisfy several failure conditions at once (cancelled and
//! wrong-event, say), so the order below is load-bearing and must not be
//! rearranged:
//!
//! 1. wrong event (operator scanning error, unrelated to ticket state)
//! 2. already checked in (outranks expiry so gate staff still get the
//!    duplicate-scan context after an event has ended)
//! 3. cancelled
//! 4. waitlisted
//! 5. expired (past the event's check-in window)
//!
//! Pure function of its inputs; resolution failures are classified before
//! this point.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::checkin::error::CheckInError;
use crate::checkin::resolver::ResolvedTicket;
use crate::models::BookingStatus;

pub fn validate(
    resolved: &ResolvedTicket,
    scoped_event_id: Option<Uuid>,
    now: DateTime<Utc>,
    window: Duration,
) -> Result<(), CheckInError> {
    let ResolvedTicket {
        booking,
        user,
        event,
    } = resolved;

    if let Some(scope) = scoped_event_id {
        if booking.event_id != scope {
            return Err(CheckInError::WrongEvent {
                event_title: event.title.clone(),
            });
        }
    }

    match booking.status {
        BookingStatus::CheckedIn => {
            return Err(CheckInError::AlreadyCheckedIn {
                attendee_name: Some(user.name.clone()),
                previous_scan_at: booking.checked_in_at,
            });
        }
        BookingStatus::Cancelled => return Err(CheckInError::Cancelled),
        BookingStatus::Waitlisted => return Err(CheckInError::Waitlisted),
        BookingStatus::Confirmed => {}
    }

    let window_end = event.check_in_window_end(window);
    if now > window_end {
        return Err(CheckInError::Expired {
            event_title: event.title.clone(),
            window_closed_at: window_end,
        });
    }

    Ok(())
}
