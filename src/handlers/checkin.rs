use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::checkin::{CheckInError, Operator};
use crate::models::CheckInMethod;
use crate::state::AppState;
use crate::utils::response::{error as error_response, success};

/// Operator identity travels in a header set by the gate device. There is
/// no session layer here; the id is trusted as-is and recorded verbatim as
/// check-in provenance.
const OPERATOR_HEADER: &str = "x-operator-id";

#[derive(Deserialize)]
pub struct CheckInRequest {
    /// Decoded QR payload or typed ticket code.
    pub input: String,
    #[serde(default)]
    pub method: Option<CheckInMethod>,
    /// Event the gate session is scoped to, if any.
    #[serde(default)]
    pub event_id: Option<Uuid>,
}

pub async fn check_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CheckInRequest>,
) -> Response {
    let Some(operator) = operator_from_headers(&headers) else {
        return render_failure(&CheckInError::AuthRequired);
    };

    let method = req.method.unwrap_or(CheckInMethod::QrScan);
    match state
        .engine
        .attempt(&req.input, req.event_id, &operator, method)
        .await
    {
        Ok(result) => success(result, "Ticket checked in").into_response(),
        Err(err) => render_failure(&err),
    }
}

fn operator_from_headers(headers: &HeaderMap) -> Option<Operator> {
    headers
        .get(OPERATOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(Operator::new)
}

/// Classified attempt failures are part of the normal operator loop, so
/// they render with their full display context rather than through the
/// generic application-error path.
fn render_failure(err: &CheckInError) -> Response {
    let failure = err.display();
    tracing::debug!(reason = failure.reason, "check-in attempt failed");
    error_response(
        err.code(),
        failure.message.clone(),
        serde_json::to_value(&failure).ok(),
        err.status_code(),
    )
}
