//! One check-in attempt, end to end: parse → resolve → validate → commit.
//!
//! The engine owns the two blocking points (resolve read, conditional
//! commit write) and bounds each with a timeout plus a single retry for
//! infrastructure failures. Business failures are never retried.

use std::future::Future;
use std::sync::Arc;

use chrono::Duration;
use serde::Serialize;
use uuid::Uuid;

use crate::checkin::clock::Clock;
use crate::checkin::committer::{self, Operator};
use crate::checkin::error::CheckInError;
use crate::checkin::resolver;
use crate::checkin::validator;
use crate::models::{Booking, CheckInMethod, Event, User};
use crate::store::BookingStore;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long after an event's start time check-in stays open.
    pub check_in_window: Duration,
    /// Bound on each store round trip (resolve read, commit write).
    pub store_timeout: std::time::Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            check_in_window: Duration::hours(4),
            store_timeout: std::time::Duration::from_secs(3),
        }
    }
}

/// Result shape handed to the presentation layer on success.
#[derive(Debug, Clone, Serialize)]
pub struct CheckInSuccess {
    pub booking: Booking,
    pub user: User,
    pub event: Event,
}

pub struct CheckInEngine<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl<S: BookingStore> CheckInEngine<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, config: EngineConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Run one complete attempt. Returns either the committed booking with
    /// its display context, or exactly one classified error.
    pub async fn attempt(
        &self,
        raw_input: &str,
        scoped_event_id: Option<Uuid>,
        operator: &Operator,
        method: CheckInMethod,
    ) -> Result<CheckInSuccess, CheckInError> {
        // Sanitization happens here, before any store traffic.
        let input = resolver::parse_scan_input(raw_input)?;

        let resolved = self
            .bounded(|| resolver::resolve(self.store.as_ref(), &input))
            .await?;

        validator::validate(
            &resolved,
            scoped_event_id,
            self.clock.now(),
            self.config.check_in_window,
        )?;

        let booking = self
            .bounded(|| {
                committer::commit(
                    self.store.as_ref(),
                    resolved.booking.id,
                    operator,
                    method,
                    self.clock.now(),
                )
            })
            .await?;

        Ok(CheckInSuccess {
            booking,
            user: resolved.user,
            event: resolved.event,
        })
    }

    /// Apply the store timeout and one retry for transient failures. The
    /// retried operation restarts from scratch, so a commit retry still
    /// goes through the store's conditional write.
    async fn bounded<T, F, Fut>(&self, op: F) -> Result<T, CheckInError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, CheckInError>>,
    {
        let mut last_err = CheckInError::Transient {
            reason: "store operation timed out".to_string(),
        };

        for attempt in 0..2 {
            match tokio::time::timeout(self.config.store_timeout, op()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(err)) if err.is_retryable() => {
                    tracing::warn!(attempt, error = %err, "transient store failure");
                    last_err = err;
                }
                Ok(Err(err)) => return Err(err),
                Err(_) => {
                    tracing::warn!(attempt, "store operation timed out");
                    last_err = CheckInError::Transient {
                        reason: "store operation timed out".to_string(),
                    };
                }
            }
        }

        Err(last_err)
    }
}
