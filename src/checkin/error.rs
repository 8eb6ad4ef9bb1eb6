use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Every way a check-in attempt can fail. Each variant carries only the
/// context its display needs; exhaustive matching replaces the
/// string-union fallthrough this taxonomy started as.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckInError {
    #[error("ticket code contains characters outside the allowed set")]
    InvalidFormat,

    #[error("no booking matches this ticket")]
    NotFound,

    #[error("ticket belongs to a different event")]
    WrongEvent { event_title: String },

    #[error("ticket was already checked in")]
    AlreadyCheckedIn {
        attendee_name: Option<String>,
        previous_scan_at: Option<DateTime<Utc>>,
    },

    #[error("booking was cancelled")]
    Cancelled,

    #[error("booking is waitlisted, not confirmed")]
    Waitlisted,

    #[error("check-in window has closed")]
    Expired {
        event_title: String,
        window_closed_at: DateTime<Utc>,
    },

    #[error("no operator identity available")]
    AuthRequired,

    #[error("store unavailable: {reason}")]
    Transient { reason: String },
}

impl From<StoreError> for CheckInError {
    fn from(err: StoreError) -> Self {
        CheckInError::Transient {
            reason: err.to_string(),
        }
    }
}

/// What the presentation layer renders for a failed attempt. The UI never
/// derives business state itself; everything it shows is in here.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDisplay {
    pub title: &'static str,
    pub message: String,
    pub reason: &'static str,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_scan_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_closed_at: Option<DateTime<Utc>>,
}

impl CheckInError {
    /// Stable lowercase code, one per taxonomy entry.
    pub fn reason(&self) -> &'static str {
        match self {
            CheckInError::InvalidFormat => "invalid_format",
            CheckInError::NotFound => "not_found",
            CheckInError::WrongEvent { .. } => "wrong_event",
            CheckInError::AlreadyCheckedIn { .. } => "already_checked_in",
            CheckInError::Cancelled => "cancelled",
            CheckInError::Waitlisted => "waitlist",
            CheckInError::Expired { .. } => "expired",
            CheckInError::AuthRequired => "auth_required",
            CheckInError::Transient { .. } => "infra_transient",
        }
    }

    /// Only infrastructure failures may be retried automatically; every
    /// ticket-state failure is final for the attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckInError::Transient { .. })
    }

    pub fn code(&self) -> &'static str {
        match self {
            CheckInError::InvalidFormat => "INVALID_FORMAT",
            CheckInError::NotFound => "NOT_FOUND",
            CheckInError::WrongEvent { .. } => "WRONG_EVENT",
            CheckInError::AlreadyCheckedIn { .. } => "ALREADY_CHECKED_IN",
            CheckInError::Cancelled => "CANCELLED",
            CheckInError::Waitlisted => "WAITLIST",
            CheckInError::Expired { .. } => "EXPIRED",
            CheckInError::AuthRequired => "AUTH_REQUIRED",
            CheckInError::Transient { .. } => "STORE_UNAVAILABLE",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CheckInError::InvalidFormat => StatusCode::BAD_REQUEST,
            CheckInError::NotFound => StatusCode::NOT_FOUND,
            CheckInError::WrongEvent { .. }
            | CheckInError::AlreadyCheckedIn { .. }
            | CheckInError::Cancelled
            | CheckInError::Waitlisted
            | CheckInError::Expired { .. } => StatusCode::CONFLICT,
            CheckInError::AuthRequired => StatusCode::UNAUTHORIZED,
            CheckInError::Transient { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn display(&self) -> ErrorDisplay {
        let mut display = ErrorDisplay {
            title: self.title(),
            message: self.to_string(),
            reason: self.reason(),
            retryable: self.is_retryable(),
            attendee_name: None,
            previous_scan_at: None,
            event_title: None,
            window_closed_at: None,
        };

        match self {
            CheckInError::AlreadyCheckedIn {
                attendee_name,
                previous_scan_at,
            } => {
                display.attendee_name = attendee_name.clone();
                display.previous_scan_at = *previous_scan_at;
            }
            CheckInError::WrongEvent { event_title } => {
                display.event_title = Some(event_title.clone());
            }
            CheckInError::Expired {
                event_title,
                window_closed_at,
            } => {
                display.event_title = Some(event_title.clone());
                display.window_closed_at = Some(*window_closed_at);
            }
            _ => {}
        }

        display
    }

    fn title(&self) -> &'static str {
        match self {
            CheckInError::InvalidFormat => "Unreadable ticket",
            CheckInError::NotFound => "Ticket not found",
            CheckInError::WrongEvent { .. } => "Wrong event",
            CheckInError::AlreadyCheckedIn { .. } => "Already checked in",
            CheckInError::Cancelled => "Booking cancelled",
            CheckInError::Waitlisted => "On waitlist",
            CheckInError::Expired { .. } => "Check-in closed",
            CheckInError::AuthRequired => "Sign in required",
            CheckInError::Transient { .. } => "Connection problem",
        }
    }
}
