//! Per-device scan session: idle → processing → success/error → idle.
//!
//! The session owns UI-facing state only; every business rule lives in the
//! engine. One attempt is in flight at a time per session: input arriving
//! while an attempt is processing is dropped, not queued, so a double-tap
//! or a camera firing two decodes for one physical scan cannot start two
//! attempts.

use uuid::Uuid;

use crate::checkin::committer::Operator;
use crate::checkin::engine::{CheckInEngine, CheckInSuccess};
use crate::checkin::error::CheckInError;
use crate::models::CheckInMethod;
use crate::store::BookingStore;

/// UI-facing state of the session. `Success` and `Error` persist until the
/// operator acknowledges them ("scan next" / "try again").
#[derive(Debug, Clone)]
pub enum SessionPhase {
    Idle,
    Processing,
    Success(CheckInSuccess),
    Error(CheckInError),
}

impl SessionPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionPhase::Idle)
    }
}

/// What became of one submitted input.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The input was processed; the session phase now holds the result.
    Completed,
    /// An attempt was already in flight (or awaiting acknowledgment); the
    /// input was dropped.
    Ignored,
}

pub struct CheckInSession<S> {
    engine: CheckInEngine<S>,
    operator: Operator,
    scoped_event_id: Option<Uuid>,
    phase: tokio::sync::Mutex<SessionPhase>,
}

impl<S: BookingStore> CheckInSession<S> {
    /// Operator identity and event scope are fixed for the session's
    /// lifetime and passed explicitly, never read from ambient state.
    pub fn new(engine: CheckInEngine<S>, operator: Operator, scoped_event_id: Option<Uuid>) -> Self {
        Self {
            engine,
            operator,
            scoped_event_id,
            phase: tokio::sync::Mutex::new(SessionPhase::Idle),
        }
    }

    /// Submit one decoded QR string or typed ticket code. Only accepted
    /// from `Idle`; anything else means the previous attempt is still in
    /// flight or still on screen.
    pub async fn submit(&self, raw_input: &str, method: CheckInMethod) -> SubmitOutcome {
        {
            let mut phase = self.phase.lock().await;
            if !phase.is_idle() {
                tracing::debug!("scan dropped: session not idle");
                return SubmitOutcome::Ignored;
            }
            *phase = SessionPhase::Processing;
        }

        let result = self
            .engine
            .attempt(raw_input, self.scoped_event_id, &self.operator, method)
            .await;

        let mut phase = self.phase.lock().await;
        *phase = match result {
            Ok(success) => SessionPhase::Success(success),
            Err(err) => SessionPhase::Error(err),
        };
        SubmitOutcome::Completed
    }

    /// Operator acknowledgment: clear the shown result and return to idle,
    /// ready for the next scan. No-op while processing.
    pub async fn acknowledge(&self) {
        let mut phase = self.phase.lock().await;
        let in_flight = matches!(*phase, SessionPhase::Processing);
        if !in_flight {
            *phase = SessionPhase::Idle;
        }
    }

    pub async fn phase(&self) -> SessionPhase {
        self.phase.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkin::clock::FixedClock;
    use crate::checkin::engine::EngineConfig;
    use crate::checkin::testutil::fixtures;
    use crate::models::BookingStatus;
    use crate::store::MemoryBookingStore;
    use chrono::Utc;
    use std::sync::Arc;

    async fn session_with_two_bookings() -> (Arc<CheckInSession<MemoryBookingStore>>, String, String)
    {
        let store = MemoryBookingStore::new();
        let fx = fixtures::seed_confirmed(&store).await;
        let second =
            fixtures::booking_with_status(&fx.event, &fx.user, BookingStatus::Confirmed);
        let second_code = second.ticket_code.clone();
        store.insert_booking(second).await;

        let engine = CheckInEngine::new(
            Arc::new(store),
            Arc::new(FixedClock::new(Utc::now())),
            EngineConfig::default(),
        );
        let session = CheckInSession::new(engine, Operator::new("gate-1"), Some(fx.event.id));
        (Arc::new(session), fx.booking.ticket_code.clone(), second_code)
    }

    #[tokio::test]
    async fn scan_cycle_ends_in_success_then_resets() {
        let (session, code, _) = session_with_two_bookings().await;

        session.submit(&code, CheckInMethod::QrScan).await;
        assert!(matches!(session.phase().await, SessionPhase::Success(_)));

        session.acknowledge().await;
        assert!(session.phase().await.is_idle());
    }

    #[tokio::test]
    async fn failure_is_shown_until_acknowledged() {
        let (session, code, _) = session_with_two_bookings().await;

        session.submit(&code, CheckInMethod::QrScan).await;
        session.acknowledge().await;

        // Re-scan of the same ticket: duplicate, held on screen.
        session.submit(&code, CheckInMethod::QrScan).await;
        match session.phase().await {
            SessionPhase::Error(CheckInError::AlreadyCheckedIn { .. }) => {}
            other => panic!("expected duplicate-scan error, got {other:?}"),
        }

        session.acknowledge().await;
        assert!(session.phase().await.is_idle());
    }

    #[tokio::test]
    async fn input_is_dropped_while_result_awaits_acknowledgment() {
        let (session, code, second_code) = session_with_two_bookings().await;

        session.submit(&code, CheckInMethod::QrScan).await;

        // Result still on screen; the next scan must be ignored, not queued.
        let outcome = session.submit(&second_code, CheckInMethod::QrScan).await;
        assert!(matches!(outcome, SubmitOutcome::Ignored));
        assert!(matches!(session.phase().await, SessionPhase::Success(_)));

        // After acknowledgment the second ticket scans normally.
        session.acknowledge().await;
        session.submit(&second_code, CheckInMethod::QrScan).await;
        assert!(matches!(session.phase().await, SessionPhase::Success(_)));
    }

    #[tokio::test]
    async fn concurrent_submissions_process_exactly_one() {
        let (session, code, second_code) = session_with_two_bookings().await;

        let a = {
            let session = Arc::clone(&session);
            let code = code.clone();
            tokio::spawn(async move { session.submit(&code, CheckInMethod::QrScan).await })
        };
        let b = {
            let session = Arc::clone(&session);
            let code = second_code.clone();
            tokio::spawn(async move { session.submit(&code, CheckInMethod::QrScan).await })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        let completed = [&a, &b]
            .iter()
            .filter(|o| matches!(o, SubmitOutcome::Completed))
            .count();
        // Exactly one attempt ran; its result is on screen.
        assert_eq!(completed, 1);
        assert!(matches!(session.phase().await, SessionPhase::Success(_)));
    }
}
