//! The check-in decision engine.
//!
//! A scan travels resolver → validator → committer, driven either one-shot
//! through [`CheckInEngine::attempt`] (the HTTP handler path) or repeatedly
//! through a [`CheckInSession`] (the gate-device loop). The committer's
//! write is a conditional update, so a booking transitions to checked-in at
//! most once even across racing devices.

pub mod clock;
pub mod committer;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod session;
pub mod validator;

#[cfg(test)]
pub mod testutil;

pub use clock::{Clock, FixedClock, SystemClock};
pub use committer::Operator;
pub use engine::{CheckInEngine, CheckInSuccess, EngineConfig};
pub use error::{CheckInError, ErrorDisplay};
pub use resolver::{ResolvedTicket, ScanInput};
pub use session::{CheckInSession, SessionPhase, SubmitOutcome};
