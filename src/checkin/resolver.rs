//! Ticket resolution: raw scan input to a (booking, user, event) triple.
//!
//! Resolution makes no business decisions; a cancelled or already-used
//! ticket still resolves. It only parses, sanitizes and looks up. The
//! sanitization step runs before any lookup so unvetted input never reaches
//! the store as a key.

use serde::Deserialize;
use uuid::Uuid;

use crate::checkin::error::CheckInError;
use crate::models::{Booking, Event, User};
use crate::store::BookingStore;

/// Canonical form of one scan, after parsing but before lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanInput {
    /// Direct booking reference, from a QR payload or a pasted id.
    BookingId(Uuid),
    /// Human-presentable ticket code, typed at the gate.
    TicketCode(String),
}

/// Structure encoded in ticket QR codes. Extra fields are ignored; only
/// the booking reference is trusted as a lookup key.
#[derive(Deserialize)]
struct QrPayload {
    #[serde(rename = "bookingId")]
    booking_id: String,
}

/// A fully resolved ticket. All three records are required; a dangling
/// booking (deleted event or user) is reported as not-found upstream.
#[derive(Debug, Clone)]
pub struct ResolvedTicket {
    pub booking: Booking,
    pub user: User,
    pub event: Event,
}

/// Parse and sanitize raw scanner/keyboard input. Pure; never touches the
/// store.
pub fn parse_scan_input(raw: &str) -> Result<ScanInput, CheckInError> {
    let trimmed = raw.trim();

    if trimmed.starts_with('{') {
        let payload: QrPayload =
            serde_json::from_str(trimmed).map_err(|_| CheckInError::InvalidFormat)?;
        let id = sanitize(&payload.booking_id)?;
        let id = Uuid::parse_str(id).map_err(|_| CheckInError::InvalidFormat)?;
        return Ok(ScanInput::BookingId(id));
    }

    let code = sanitize(trimmed)?;
    match Uuid::parse_str(code) {
        Ok(id) => Ok(ScanInput::BookingId(id)),
        Err(_) => Ok(ScanInput::TicketCode(code.to_string())),
    }
}

/// Allow-list check: alphanumerics, hyphen and underscore only. Everything
/// else is rejected before it can be used as a lookup key.
fn sanitize(value: &str) -> Result<&str, CheckInError> {
    let value = value.trim();
    if value.is_empty()
        || !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CheckInError::InvalidFormat);
    }
    Ok(value)
}

/// Look up the booking and its event and user. Read-only.
pub async fn resolve<S: BookingStore>(
    store: &S,
    input: &ScanInput,
) -> Result<ResolvedTicket, CheckInError> {
    let booking = match input {
        ScanInput::BookingId(id) => store.booking_by_id(*id).await?,
        ScanInput::TicketCode(code) => store.booking_by_ticket_code(code).await?,
    };
    let Some(booking) = booking else {
        return Err(CheckInError::NotFound);
    };

    let event = store.event_by_id(booking.event_id).await?;
    let user = store.user_by_id(booking.user_id).await?;
    match (event, user) {
        (Some(event), Some(user)) => Ok(ResolvedTicket {
            booking,
            user,
            event,
        }),
        // The booking points at a deleted event or user; treat the ticket
        // as unresolvable rather than failing deeper in the pipeline.
        _ => Err(CheckInError::NotFound),
    }
}
