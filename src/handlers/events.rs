use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::state::AppState;
use crate::store::BookingStore;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = state
        .engine
        .store()
        .event_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event with id '{event_id}' was not found")))?;

    Ok(success(event, "Event retrieved").into_response())
}

#[derive(Serialize)]
struct CheckedInCount {
    event_id: Uuid,
    checked_in: i64,
}

/// Live tally for the gate dashboard.
pub async fn checked_in_count(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let store = state.engine.store();
    if store.event_by_id(event_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Event with id '{event_id}' was not found"
        )));
    }

    let checked_in = store.checked_in_count(event_id).await?;
    Ok(success(
        CheckedInCount {
            event_id,
            checked_in,
        },
        "Checked-in count retrieved",
    )
    .into_response())
}
