use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: String,
    pub event_date: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// End of the effective check-in window.
    ///
    /// Events carry no stored end time, so the window is a fixed duration
    /// past the start (configurable, 4 hours by default).
    // TODO: store an end time per event instead of deriving one.
    pub fn check_in_window_end(&self, window: Duration) -> DateTime<Utc> {
        self.event_date + window
    }
}
